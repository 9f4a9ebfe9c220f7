use std::collections::BTreeSet;

/// Variable storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XptType {
    Num,
    Char,
}

impl XptType {
    pub fn from_ntype(ntype: i16) -> Option<Self> {
        match ntype {
            1 => Some(Self::Num),
            2 => Some(Self::Char),
            _ => None,
        }
    }

    pub fn to_ntype(self) -> i16 {
        match self {
            Self::Num => 1,
            Self::Char => 2,
        }
    }
}

/// Variable definition from a NAMESTR record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XptColumn {
    pub name: String,
    pub label: Option<String>,
    pub data_type: XptType,
    /// Bytes per observation.
    pub length: u16,
}

impl XptColumn {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            data_type: XptType::Num,
            length: 8,
        }
    }

    pub fn character(name: impl Into<String>, length: u16) -> Self {
        Self {
            name: name.into(),
            label: None,
            data_type: XptType::Char,
            length,
        }
    }
}

/// Reader options.
#[derive(Debug, Clone, Default)]
pub struct XptReadOptions {
    /// Only decode these variables (matched case-insensitively).
    /// `None` decodes everything.
    pub columns: Option<BTreeSet<String>>,
}

impl XptReadOptions {
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns = Some(
            columns
                .into_iter()
                .map(|name| name.as_ref().to_ascii_uppercase())
                .collect(),
        );
        self
    }

    pub(crate) fn wants(&self, name: &str) -> bool {
        self.columns
            .as_ref()
            .is_none_or(|set| set.contains(&name.to_ascii_uppercase()))
    }
}
