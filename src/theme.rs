use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub axis_color: String,
    pub grid_color: String,
    pub center_marker_color: String,
    pub background: String,
}

impl Theme {
    /// Close to the classic matplotlib look: black frame, grey grid.
    pub fn classic() -> Self {
        Self {
            font_family: "DejaVu Sans, Helvetica, Arial, sans-serif".to_string(),
            font_size: 10.0,
            text_color: "#000000".to_string(),
            axis_color: "#000000".to_string(),
            grid_color: "#b0b0b0".to_string(),
            center_marker_color: "#000000".to_string(),
            background: "#ffffff".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 11.0,
            text_color: "#1c2430".to_string(),
            axis_color: "#7a8aa6".to_string(),
            grid_color: "#c7d2e5".to_string(),
            center_marker_color: "#1c2430".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
