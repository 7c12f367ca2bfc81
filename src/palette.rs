use eframe::egui::Color32;

pub const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub const LABEL_TEXT: Color32 = Color32::from_gray(230);
pub const CONNECTOR: Color32 = Color32::from_rgba_premultiplied(110, 120, 132, 160);
pub const OUTLINE: Color32 = Color32::from_rgba_premultiplied(12, 14, 18, 200);
pub const ACTIVE: Color32 = Color32::from_rgb(245, 206, 93);
pub const BRIDGE_FILL: Color32 = Color32::from_rgb(241, 146, 94);

pub fn funnel_color(index: usize, count: usize) -> Color32 {
    let t = if count <= 1 {
        0.0
    } else {
        index as f32 / (count - 1) as f32
    };
    Color32::from_rgb(
        (62.0 - 22.0 * t) as u8,
        (118.0 + 60.0 * t) as u8,
        (214.0 - 58.0 * t) as u8,
    )
}

pub fn sector_color(index: usize) -> Color32 {
    const PALETTE: [Color32; 4] = [
        Color32::from_rgb(76, 175, 132),
        Color32::from_rgb(58, 150, 120),
        Color32::from_rgb(96, 190, 150),
        Color32::from_rgb(48, 132, 108),
    ];
    PALETTE[index % PALETTE.len()]
}

pub fn svg_color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
