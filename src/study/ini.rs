use std::collections::HashMap;

/// Sections of `key = value` pairs. Section names and keys are case-insensitive.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IniDocument {
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniDocument {
    /// Parses INI text. On failure, returns the 1-based line number and a description.
    pub fn parse(text: &str) -> Result<Self, (usize, String)> {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.trim().trim_start_matches('\u{feff}');
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let Some(name) = header.strip_suffix(']') else {
                    return Err((line_no, format!("unterminated section header '{line}'")));
                };
                let name = name.trim().to_lowercase();
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err((line_no, format!("expected 'key = value', got '{line}'")));
            };
            let Some(section) = current.as_ref() else {
                return Err((line_no, format!("key '{}' outside of any section", key.trim())));
            };
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_lowercase(), value.trim().to_string());
        }

        Ok(Self { sections })
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_lowercase())?
            .get(&key.to_lowercase())
            .map(String::as_str)
    }
}
