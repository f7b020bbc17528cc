//! Inline style declarations and the few CSS value helpers the window
//! lifecycle needs.

const MARGIN_SIDES: [&str; 4] = ["margin-top", "margin-right", "margin-bottom", "margin-left"];

/// Ordered list of `property: value` declarations, like an element's
/// `style` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `"a: b; c: d"` style text. Property names are lowercased;
    /// malformed declarations are skipped.
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        for decl in text.split(';') {
            if let Some((prop, value)) = decl.split_once(':') {
                let prop = prop.trim();
                let value = value.trim();
                if !prop.is_empty() && !value.is_empty() {
                    style.set(prop, value);
                }
            }
        }
        style
    }

    /// Set a declaration. The `margin` shorthand expands into its four
    /// longhands following the CSS one-to-four value rules.
    pub fn set(&mut self, prop: &str, value: impl Into<String>) {
        let prop = prop.to_ascii_lowercase();
        let value = value.into();
        if prop == "margin" {
            let parts: Vec<&str> = value.split_whitespace().collect();
            let (top, right, bottom, left) = match parts.as_slice() {
                [all] => (*all, *all, *all, *all),
                [v, h] => (*v, *h, *v, *h),
                [t, h, b] => (*t, *h, *b, *h),
                [t, r, b, l, ..] => (*t, *r, *b, *l),
                [] => return,
            };
            for (side, v) in MARGIN_SIDES.iter().zip([top, right, bottom, left]) {
                self.set_longhand(side, v.to_string());
            }
            return;
        }
        self.set_longhand(&prop, value);
    }

    fn set_longhand(&mut self, prop: &str, value: String) {
        if let Some(slot) = self.declarations.iter_mut().find(|(p, _)| p == prop) {
            slot.1 = value;
        } else {
            self.declarations.push((prop.to_string(), value));
        }
    }

    /// Look up a declaration. `margin` is recomposed from its longhands when
    /// all four are present.
    pub fn get(&self, prop: &str) -> Option<&str> {
        if prop == "margin" {
            return None;
        }
        self.declarations
            .iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get) but also answers the `margin` shorthand.
    pub fn get_owned(&self, prop: &str) -> Option<String> {
        if prop == "margin" {
            let sides: Option<Vec<&str>> = MARGIN_SIDES.iter().map(|side| self.get(side)).collect();
            return sides.map(|sides| sides.join(" "));
        }
        self.get(prop).map(str::to_string)
    }

    pub fn remove(&mut self, prop: &str) {
        if prop == "margin" {
            self.declarations
                .retain(|(p, _)| !MARGIN_SIDES.contains(&p.as_str()));
        } else {
            self.declarations.retain(|(p, _)| p != prop);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Leading integer of a CSS length such as `"10px"`. Anything without a
/// leading integer yields 0.
pub fn parse_px(value: &str) -> i32 {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i32>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

pub fn px(value: i32) -> String {
    format!("{value}px")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margin {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Margin {
    pub fn to_css(self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_px_takes_leading_integer() {
        assert_eq!(parse_px("10px"), 10);
        assert_eq!(parse_px("10.7px"), 10);
        assert_eq!(parse_px(" -4px"), -4);
        assert_eq!(parse_px("auto"), 0);
        assert_eq!(parse_px(""), 0);
        assert_eq!(parse_px("px"), 0);
    }

    #[test]
    fn margin_shorthand_expands_and_recomposes() {
        let mut style = InlineStyle::new();
        style.set("margin", "10px 5px");
        assert_eq!(style.get("margin-top"), Some("10px"));
        assert_eq!(style.get("margin-left"), Some("5px"));
        assert_eq!(style.get_owned("margin").as_deref(), Some("10px 5px 10px 5px"));

        style.set("margin", "0px");
        assert_eq!(style.get_owned("margin").as_deref(), Some("0px 0px 0px 0px"));

        style.remove("margin");
        assert!(style.get_owned("margin").is_none());
        assert!(style.is_empty());
    }

    #[test]
    fn parse_skips_malformed_declarations() {
        let style = InlineStyle::parse("display: none; bogus; width: 20px;");
        assert_eq!(style.get("display"), Some("none"));
        assert_eq!(style.get("width"), Some("20px"));
        assert_eq!(style.css_text(), "display: none; width: 20px;");
    }

    #[test]
    fn property_names_are_case_insensitive() {
        let style = InlineStyle::parse("Margin: 1px 2px; Vertical-Align: TOP");
        assert_eq!(style.get("margin-top"), Some("1px"));
        assert_eq!(style.get("margin-left"), Some("2px"));
        assert_eq!(style.get_owned("margin").as_deref(), Some("1px 2px 1px 2px"));
        assert_eq!(style.get("vertical-align"), Some("TOP"));
        assert!(style.iter().all(|(prop, _)| prop == prop.to_ascii_lowercase()));
    }

    #[test]
    fn margin_css_round_trips_through_shorthand() {
        let m = Margin {
            top: 10,
            right: 5,
            bottom: 10,
            left: 5,
        };
        let mut style = InlineStyle::new();
        style.set("margin", m.to_css());
        assert_eq!(style.get_owned("margin"), Some(m.to_css()));
    }
}
