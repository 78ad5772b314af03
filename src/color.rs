//! 24-bit RGB helpers and the selection-highlight tint.

/// Packed 24-bit RGB, `0xRRGGBB`.
pub type Rgb = u32;

pub const NEUTRAL_GRAY: Rgb = 0x808080;
pub const WHITE: Rgb = 0xffffff;

/// Lightness offset applied to the selected object's color.
pub const HIGHLIGHT_LIGHTNESS: f32 = 0.2;

pub fn unpack(color: Rgb) -> [f32; 3] {
    [
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
    ]
}

pub fn pack(rgb: [f32; 3]) -> Rgb {
    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (to_byte(rgb[0]) << 16) | (to_byte(rgb[1]) << 8) | to_byte(rgb[2])
}

/// Lighter variant of `color`: same hue/saturation, lightness raised by
/// [`HIGHLIGHT_LIGHTNESS`] and clamped at white.
pub fn lighter(color: Rgb) -> Rgb {
    let (h, s, l) = rgb_to_hsl(unpack(color));
    pack(hsl_to_rgb(h, s, (l + HIGHLIGHT_LIGHTNESS).min(1.0)))
}

fn rgb_to_hsl(rgb: [f32; 3]) -> (f32, f32, f32) {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;
    if (max - min).abs() < f32::EPSILON {
        return (0.0, 0.0, l);
    }
    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let h = if max == r {
        ((g - b) / delta + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };
    (h, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
