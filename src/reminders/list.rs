/// Display color of a reminder list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ListColor {
    /// Build from color components in the 0.0..=1.0 range.
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    pub fn from_components(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: (r * 255.0) as u8,
            g: (g * 255.0) as u8,
            b: (b * 255.0) as u8,
        }
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        Some(Self {
            r: u8::from_str_radix(&hex[0..2], 16).ok()?,
            g: u8::from_str_radix(&hex[2..4], 16).ok()?,
            b: u8::from_str_radix(&hex[4..6], 16).ok()?,
        })
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone)]
pub struct ReminderList {
    pub id: String,
    pub name: String,
    pub color: Option<ListColor>,
    /// Filled in by the query layer; stores report zero.
    pub pending: usize,
    pub total: usize,
}

impl ReminderList {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: Option<ListColor>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            pending: 0,
            total: 0,
        }
    }

    /// Case-insensitive exact name match.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
