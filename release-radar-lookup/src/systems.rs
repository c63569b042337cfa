use release_radar_core::Platform;

/// Map an IGDB platform id to the platform tag it is tracked under.
///
/// Mac and Linux releases are folded into `Pc`. Platforms the tracker does
/// not follow map to `None` and are dropped from results.
pub fn platform_from_igdb(igdb_id: u32) -> Option<Platform> {
    match igdb_id {
        // PC (Windows), Mac, Linux
        6 | 14 | 3 => Some(Platform::Pc),
        167 => Some(Platform::Ps5),
        // Xbox Series X|S
        169 => Some(Platform::Xbox),
        130 => Some(Platform::Switch),
        _ => None,
    }
}
