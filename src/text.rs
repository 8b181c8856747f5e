//! Font-independent text width estimates. Used to crop the chart tightly
//! around its tick and axis labels without loading system fonts.

/// Advance width of `ch` as a fraction of the font size, for a typical
/// sans-serif face.
pub(crate) fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.318,
        '.' | ',' | ':' | ';' | '!' | '|' | 'i' | 'j' | 'l' => 0.278,
        '(' | ')' | '[' | ']' => 0.390,
        '-' => 0.361,
        '+' | '=' | '<' | '>' => 0.838,
        '0'..='9' => 0.636,
        'm' | 'M' | 'W' => 0.974,
        'w' => 0.818,
        'f' | 't' | 'r' => 0.392,
        'I' => 0.295,
        'A'..='Z' => 0.684,
        'a'..='z' => 0.600,
        '@' | '#' | '%' | '&' => 0.946,
        _ => 0.620,
    }
}

pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Formats an axis tick value with at most `max_decimals` decimals and no
/// trailing zeros.
pub fn format_tick(value: f64, max_decimals: usize) -> String {
    let mut text = format!("{value:.max_decimals$}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Decimals needed to tell ticks `step` apart.
pub fn tick_decimals(step: f64) -> usize {
    if !(step.is_finite() && step > 0.0) {
        return 0;
    }
    let magnitude = -step.log10().floor();
    (magnitude.max(0.0) as usize + 3).min(6)
}
