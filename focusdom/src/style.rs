/// Inline style declarations of an element, in source order.
///
/// Stored on the element as its `style` attribute so that styles survive
/// a serialize/reparse cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(source: &str) -> Self {
        let declarations = source
            .split(';')
            .filter_map(|decl| {
                let (property, value) = decl.split_once(':')?;
                let property = property.trim().to_ascii_lowercase();
                let value = value.trim();
                if property.is_empty() || value.is_empty() {
                    return None;
                }
                Some((property, value.to_string()))
            })
            .collect();
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Set a property. An empty value removes it.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.remove(property);
            return;
        }
        match self
            .declarations
            .iter_mut()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
        {
            Some(slot) => slot.1 = value,
            None => self
                .declarations
                .push((property.to_ascii_lowercase(), value)),
        }
    }

    pub fn remove(&mut self, property: &str) {
        self.declarations
            .retain(|(p, _)| !p.eq_ignore_ascii_case(property));
    }

    /// Pixel value of a property, if it parses as one.
    pub fn px(&self, property: &str) -> Option<f64> {
        self.get(property).and_then(px)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{property}: {value};")?;
        }
        Ok(())
    }
}

/// Parse a CSS length such as `"12px"` or `"12"` into pixels.
pub fn px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}
