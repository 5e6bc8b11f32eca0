use slug::slugify;

use crate::models::area::Area;

/// Turns raw selector input into an area id.
///
/// Numbers are taken as ids. Anything else is matched by slug against the
/// known areas, so `ti` or `Tecnología` pick the area with that name.
/// Empty input, `undefined`, or an unknown name select nothing.
pub fn resolve_area_selection(raw: &str, areas: &[Area]) -> Option<i64> {
    let value = raw.trim();
    if value.is_empty() || value == "undefined" {
        return None;
    }

    if let Ok(id) = value.parse::<i64>() {
        return Some(id);
    }

    let wanted = slugify(value);
    areas
        .iter()
        .find(|area| slugify(&area.name) == wanted)
        .and_then(|area| i64::try_from(area.id).ok())
}

pub fn find_area(areas: &[Area], area_id: u64) -> Option<&Area> {
    areas.iter().find(|area| area.id == area_id)
}
