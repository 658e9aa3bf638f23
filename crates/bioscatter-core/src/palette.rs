#![forbid(unsafe_code)]

//! Fixed cluster color palette and legend names.
//!
//! The four named clusters keep the colors the original chart assigned:
//! 0 lightcoral, 1 lightseagreen, 2 darkorchid, -1 darkorange. Labels
//! outside that set fall back to a fixed gray so an unexpected backend
//! label renders visibly instead of inheriting an arbitrary color.

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from components.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// CSS `lightcoral`, cluster 0.
pub const LIGHT_CORAL: Rgb = Rgb::new(240, 128, 128);
/// CSS `lightseagreen`, cluster 1.
pub const LIGHT_SEA_GREEN: Rgb = Rgb::new(32, 178, 170);
/// CSS `darkorchid`, cluster 2.
pub const DARK_ORCHID: Rgb = Rgb::new(153, 50, 204);
/// CSS `darkorange`, cluster -1 (noise).
pub const DARK_ORANGE: Rgb = Rgb::new(255, 140, 0);
/// Fallback for labels outside the named set.
pub const FALLBACK_GRAY: Rgb = Rgb::new(128, 128, 128);

/// The color for a cluster label.
pub const fn cluster_color(label: i32) -> Rgb {
    match label {
        0 => LIGHT_CORAL,
        1 => LIGHT_SEA_GREEN,
        2 => DARK_ORCHID,
        -1 => DARK_ORANGE,
        _ => FALLBACK_GRAY,
    }
}

/// The legend name for a cluster label. `-1` is density-clustering noise.
pub fn cluster_name(label: i32) -> String {
    if label == -1 {
        "noise".to_string()
    } else {
        format!("cluster {label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_clusters_keep_original_colors() {
        assert_eq!(cluster_color(0), Rgb::new(240, 128, 128));
        assert_eq!(cluster_color(1), Rgb::new(32, 178, 170));
        assert_eq!(cluster_color(2), Rgb::new(153, 50, 204));
        assert_eq!(cluster_color(-1), Rgb::new(255, 140, 0));
    }

    #[test]
    fn unknown_labels_fall_back_to_gray() {
        assert_eq!(cluster_color(3), FALLBACK_GRAY);
        assert_eq!(cluster_color(99), FALLBACK_GRAY);
        assert_eq!(cluster_color(-2), FALLBACK_GRAY);
    }

    #[test]
    fn noise_is_legended_explicitly() {
        assert_eq!(cluster_name(-1), "noise");
        assert_eq!(cluster_name(2), "cluster 2");
    }
}
