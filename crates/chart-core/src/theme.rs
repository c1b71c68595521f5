// File: crates/chart-core/src/theme.rs
// Summary: Light/Dark theming for tooltip content colors.

/// 8-bit RGB color, rendered as `#rrggbb` in tooltip markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    pub fn hex(&self) -> String { format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b) }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.hex()) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub date_label: Color,
    pub candle_up: Color,
    pub candle_down: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            date_label: Color::rgb(0x80, 0x80, 0x80), // gray
            candle_up: Color::rgb(0x26, 0xa6, 0x9a),
            candle_down: Color::rgb(0xef, 0x53, 0x50),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            date_label: Color::rgb(0x80, 0x80, 0x80),
            candle_up: Color::rgb(20, 160, 90),
            candle_down: Color::rgb(200, 60, 60),
        }
    }

    /// Up color when `close >= open`, down color otherwise.
    pub fn candle_color(&self, open: f64, close: f64) -> Color {
        if close >= open { self.candle_up } else { self.candle_down }
    }
}

impl Default for Theme {
    fn default() -> Self { Self::dark() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::dark(), Theme::light()]
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::dark()
}
