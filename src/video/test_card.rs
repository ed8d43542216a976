use image::{Rgba, RgbaImage};

/// Colour bars for a simulated video
///
/// Each panel gets its own hue; a bright bar sweeps across as `frame` advances
/// so playing panels are visibly moving.
pub fn test_card(width: u32, height: u32, panel_index: usize, frame: u64) -> RgbaImage {
    let hue = (panel_index as f32 * 0.2).fract();
    let base = hue_to_rgb(hue);
    let sweep = if width > 0 { (frame % width as u64) as u32 } else { 0 };
    let bar = (width / 16).max(1);

    RgbaImage::from_fn(width, height, |x, y| {
        let band = (y * 6 / height.max(1)) as f32 / 6.0;
        let shade = 0.45 + 0.55 * (1.0 - band);
        let highlight = x.wrapping_sub(sweep) < bar;

        let channel = |c: f32| {
            let value = if highlight { 1.0 } else { c * shade };
            (value.clamp(0.0, 1.0) * 255.0) as u8
        };
        Rgba([channel(base[0]), channel(base[1]), channel(base[2]), 255])
    })
}

fn hue_to_rgb(hue: f32) -> [f32; 3] {
    let h = hue * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_size_and_alpha() {
        let card = test_card(64, 36, 2, 0);
        assert_eq!(card.dimensions(), (64, 36));
        assert!(card.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_card_moves_with_frames() {
        assert_ne!(test_card(64, 36, 0, 0), test_card(64, 36, 0, 10));
        assert_eq!(test_card(64, 36, 0, 3), test_card(64, 36, 0, 3 + 64));
    }

    #[test]
    fn test_panels_get_distinct_hues() {
        let a = test_card(16, 16, 0, 5);
        let b = test_card(16, 16, 1, 5);
        assert_ne!(a.get_pixel(0, 15), b.get_pixel(0, 15));
    }
}
