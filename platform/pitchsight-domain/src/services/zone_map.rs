use crate::value_objects::prediction::{ZoneResult, ZONE_COUNT};
use serde::Serialize;

/// Where a zone sits in the strike-zone picture. Zones 0-8 tile a 3x3 grid
/// in row-major order; zones 9-12 are L-shaped wedges layered over the
/// grid's outer corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ZonePlacement {
    Grid { row: u8, col: u8 },
    Corner(CornerPos),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CornerPos {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellView {
    pub zone_id: usize,
    pub display_label: u8,
    pub placement: ZonePlacement,
    pub probability: f64,
    pub is_predicted: bool,
    pub color_intensity: f64,
}

/// Explicit enumerated geometry. Kept as a match rather than arithmetic so
/// the grid/corner split and the label offset cannot drift.
pub fn placement(zone_id: usize) -> ZonePlacement {
    match zone_id {
        0 => ZonePlacement::Grid { row: 0, col: 0 },
        1 => ZonePlacement::Grid { row: 0, col: 1 },
        2 => ZonePlacement::Grid { row: 0, col: 2 },
        3 => ZonePlacement::Grid { row: 1, col: 0 },
        4 => ZonePlacement::Grid { row: 1, col: 1 },
        5 => ZonePlacement::Grid { row: 1, col: 2 },
        6 => ZonePlacement::Grid { row: 2, col: 0 },
        7 => ZonePlacement::Grid { row: 2, col: 1 },
        8 => ZonePlacement::Grid { row: 2, col: 2 },
        9 => ZonePlacement::Corner(CornerPos::TopLeft),
        10 => ZonePlacement::Corner(CornerPos::TopRight),
        11 => ZonePlacement::Corner(CornerPos::BottomLeft),
        12 => ZonePlacement::Corner(CornerPos::BottomRight),
        other => panic!("zone id out of range: {other}"),
    }
}

/// User-visible zone number. Grid cells show 1-9; the corner wedges show
/// 11-14, skipping 10. The offset between internal index and corner label
/// is intentional and matches the service's historical numbering.
pub fn display_label(zone_id: usize) -> u8 {
    match zone_id {
        0..=8 => zone_id as u8 + 1,
        9..=12 => zone_id as u8 + 2,
        other => panic!("zone id out of range: {other}"),
    }
}

/// Linear amplification capped at 1. Raw per-zone probabilities are small
/// (mean ~= 1/13), so a x4 gain puts the visually hot range in [0,1]
/// without renormalizing over the whole vector.
pub fn color_intensity(probability: f64) -> f64 {
    (probability * 4.0).min(1.0)
}

/// rgba for a cell: red rises with intensity, blue falls, green fixed.
pub fn heat_color(intensity: f64) -> (u8, u8, u8, f64) {
    let red = (255.0 * intensity).round() as u8;
    let blue = (255.0 * (1.0 - intensity)).round() as u8;
    (red, 100, blue, 0.3 + intensity * 0.5)
}

/// Pure projection of a zone result onto the 13 fixed cells.
pub fn render_model(zone: &ZoneResult) -> Vec<CellView> {
    (0..ZONE_COUNT)
        .map(|zone_id| {
            let probability = zone.probabilities.get(zone_id).copied().unwrap_or(0.0);
            CellView {
                zone_id,
                display_label: display_label(zone_id),
                placement: placement(zone_id),
                probability,
                is_predicted: zone.predicted_zone == Some(zone_id),
                color_intensity: color_intensity(probability),
            }
        })
        .collect()
}
