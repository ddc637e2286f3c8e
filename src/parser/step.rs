use std::collections::HashMap;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    String(String),
    Real(f64),
    Integer(i64),
    Boolean(bool),
    Enum(String),
    Reference(u64),
    List(Vec<StepValue>),
    Null,
    Derived,
}

impl StepValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StepValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_reference(&self) -> Option<u64> {
        match self {
            StepValue::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// Numeric view of a measure attribute; integers widen to `f64`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StepValue::Real(f) => Some(*f),
            StepValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// References held by a single reference or by a list of them.
    #[must_use]
    pub fn references(&self) -> Vec<u64> {
        match self {
            StepValue::Reference(id) => vec![*id],
            StepValue::List(list) => list.iter().filter_map(StepValue::as_reference).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepEntity {
    pub id: u64,
    pub entity_type: String,
    pub values: Vec<StepValue>,
}

impl StepEntity {
    #[must_use]
    pub fn string_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(StepValue::as_str)
    }

    #[must_use]
    pub fn references_at(&self, index: usize) -> Vec<u64> {
        self.values
            .get(index)
            .map(StepValue::references)
            .unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct StepFile {
    pub entities: HashMap<u64, StepEntity>,
    pub schema: String,
}

impl StepFile {
    /// Parses an ISO-10303-21 exchange file.
    ///
    /// Statements may span several lines; they end at a `;` outside string
    /// literals. Only the `DATA` section contributes entities.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut entities = HashMap::new();
        let mut schema = String::new();
        let mut in_data = false;
        let mut saw_data = false;

        let mut statements = split_statements(content);
        let trailing = statements.pop().unwrap_or_default();
        if !trailing.trim().is_empty() {
            return Err(ParseError::InvalidStep {
                message: format!("unterminated statement: {}", preview(&trailing)),
            });
        }

        for statement in statements {
            let statement = statement.trim();

            if statement.starts_with("FILE_SCHEMA") {
                if let Some(start) = statement.find("('") {
                    if let Some(end) = statement[start + 2..].find('\'') {
                        schema = statement[start + 2..start + 2 + end].to_string();
                    }
                }
                continue;
            }

            // Section keywords share a statement with whatever precedes them.
            if statement.ends_with("DATA") && !statement.contains('(') {
                in_data = true;
                saw_data = true;
                continue;
            }
            if statement.ends_with("ENDSEC") {
                in_data = false;
                continue;
            }

            if in_data && statement.starts_with('#') {
                if let Some(entity) = Self::parse_entity(statement) {
                    entities.insert(entity.id, entity);
                }
            }
        }

        if !saw_data {
            return Err(ParseError::InvalidStep {
                message: "missing DATA section".to_string(),
            });
        }

        Ok(StepFile { entities, schema })
    }

    fn parse_entity(statement: &str) -> Option<StepEntity> {
        // Format: #123=IFCWALL('guid',#ref,'name',...)
        let eq_pos = statement.find('=')?;
        let id: u64 = statement[1..eq_pos].trim().parse().ok()?;

        let rest = statement[eq_pos + 1..].trim();
        let paren_pos = rest.find('(')?;
        let entity_type = rest[..paren_pos].trim().to_ascii_uppercase();

        let body = rest[paren_pos + 1..].strip_suffix(')')?;
        let values = Self::parse_values(body);

        Some(StepEntity {
            id,
            entity_type,
            values,
        })
    }

    fn parse_values(s: &str) -> Vec<StepValue> {
        let mut values = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut paren_depth = 0_i32;

        for ch in s.chars() {
            match ch {
                // A doubled quote toggles twice and stays inside the literal.
                '\'' => {
                    in_string = !in_string;
                    current.push(ch);
                }
                '(' if !in_string => {
                    paren_depth += 1;
                    current.push(ch);
                }
                ')' if !in_string => {
                    paren_depth -= 1;
                    current.push(ch);
                }
                ',' if !in_string && paren_depth == 0 => {
                    values.push(Self::parse_single_value(&current));
                    current.clear();
                }
                _ => current.push(ch),
            }
        }

        if !current.trim().is_empty() {
            values.push(Self::parse_single_value(&current));
        }

        values
    }

    fn parse_single_value(s: &str) -> StepValue {
        let s = s.trim();

        match s {
            "$" => return StepValue::Null,
            "*" => return StepValue::Derived,
            ".T." => return StepValue::Boolean(true),
            ".F." => return StepValue::Boolean(false),
            _ => {}
        }
        if let Some(id) = s.strip_prefix('#').and_then(|r| r.parse::<u64>().ok()) {
            return StepValue::Reference(id);
        }
        if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
            return StepValue::String(decode_step_string(&s[1..s.len() - 1]));
        }
        if s.len() >= 2 && s.starts_with('.') && s.ends_with('.') {
            return StepValue::Enum(s[1..s.len() - 1].to_string());
        }
        if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            return StepValue::List(Self::parse_values(inner));
        }
        if let Ok(i) = s.parse::<i64>() {
            return StepValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return StepValue::Real(f);
        }
        // Typed value like IFCLENGTHMEASURE(2.5)
        if let Some(paren_pos) = s.find('(') {
            if let Some(inner) = s[paren_pos + 1..].strip_suffix(')') {
                return Self::parse_single_value(inner);
            }
        }

        StepValue::String(s.to_string())
    }

    #[must_use]
    pub fn get_entity(&self, id: u64) -> Option<&StepEntity> {
        self.entities.get(&id)
    }

    #[must_use]
    pub fn get_entities_by_type(&self, entity_type: &str) -> Vec<&StepEntity> {
        let mut found: Vec<&StepEntity> = self
            .entities
            .values()
            .filter(|e| e.entity_type == entity_type)
            .collect();
        found.sort_by_key(|e| e.id);
        found
    }
}

/// Splits on `;` outside string literals. The last element is whatever
/// follows the final terminator.
fn split_statements(content: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string = false;

    for ch in content.chars() {
        match ch {
            '\'' => {
                in_string = !in_string;
                current.push(ch);
            }
            ';' if !in_string => statements.push(std::mem::take(&mut current)),
            '\n' | '\r' if !in_string => current.push(' '),
            _ => current.push(ch),
        }
    }
    statements.push(current);
    statements
}

fn preview(s: &str) -> String {
    s.trim().chars().take(40).collect()
}

/// Decodes STEP string escapes:
/// - `\X2\XXXX...\X0\` - UCS-2 code units in hex
/// - `\X\XX` - one ISO 8859-1 byte in hex
/// - `\S\c` - ISO 8859-1 upper half
/// - `\\` and `''`
fn decode_step_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(ch) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("\\X2\\") {
            let end = tail.find("\\X0\\").unwrap_or(tail.len());
            let hex = &tail[..end];
            let units: Vec<u16> = hex
                .as_bytes()
                .chunks(4)
                .filter_map(|c| std::str::from_utf8(c).ok())
                .filter_map(|c| u16::from_str_radix(c, 16).ok())
                .collect();
            out.extend(char::decode_utf16(units).filter_map(Result::ok));
            rest = tail.get(end + 4..).unwrap_or("");
        } else if let Some(tail) = rest.strip_prefix("\\X\\") {
            let hex = tail.get(..2).unwrap_or(tail);
            if let Ok(code) = u8::from_str_radix(hex, 16) {
                out.push(char::from(code));
            }
            rest = &tail[hex.len()..];
        } else if let Some(tail) = rest.strip_prefix("\\S\\") {
            let mut chars = tail.chars();
            if let Some(c) = chars.next() {
                if let Some(shifted) = char::from_u32(u32::from(c) + 128) {
                    out.push(shifted);
                }
            }
            rest = chars.as_str();
        } else if let Some(tail) = rest.strip_prefix("\\\\") {
            out.push('\\');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("''") {
            out.push('\'');
            rest = tail;
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    out
}
