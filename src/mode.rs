use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Mustache,
    Plain,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Mustache => "Mustache",
            Mode::Plain => "plain",
        }
    }

    pub fn placeholder(&self, identity: &str) -> String {
        match self {
            Mode::Mustache => format!("{{{{{identity}}}}}"),
            Mode::Plain => identity.to_string(),
        }
    }

    pub fn section(&self, identity: &str) -> Option<(String, String)> {
        match self {
            Mode::Mustache => Some((format!("{{{{#{identity}}}}}"), format!("{{{{/{identity}}}}}"))),
            Mode::Plain => None,
        }
    }
}

// Unknown names fall back to Mustache instead of failing
impl From<&str> for Mode {
    fn from(name: &str) -> Self {
        match name {
            "Mustache" => Mode::Mustache,
            "plain" => Mode::Plain,
            other => {
                log::debug!("Unknown mode {:?}, using {}", other, Mode::Mustache);
                Mode::Mustache
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
