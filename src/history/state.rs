/// Represents whether a source file was Downloaded or Loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    Downloaded,
    Loaded,
}

impl Event {
    pub fn as_str(&self) -> &str {
        match self {
            Event::Downloaded => "Downloaded",
            Event::Loaded => "Loaded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "downloaded" => Some(Event::Downloaded),
            "loaded" => Some(Event::Loaded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_strings() {
        for event in [Event::Downloaded, Event::Loaded] {
            assert_eq!(Event::from_str(event.as_str()), Some(event));
        }
        assert_eq!(Event::from_str("compacted"), None);
    }
}
