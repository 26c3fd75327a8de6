//! Audio/visual cues raised by the game for its collaborators

/// Symbolic game events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Place,
    LineClear,
    GameOver,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Place => "place",
            Cue::LineClear => "lineClear",
            Cue::GameOver => "gameOver",
        }
    }
}

/// Receives cues in the order the game raises them
pub trait CueSink {
    fn cue(&mut self, cue: Cue);
}

/// Drops every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CueSink for NullSink {
    fn cue(&mut self, _cue: Cue) {}
}

/// Records cues, handy for tests and for deferring to a frame loop
impl CueSink for Vec<Cue> {
    fn cue(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// An optional listener, e.g. audio that failed to initialise
impl<S: CueSink> CueSink for Option<S> {
    fn cue(&mut self, cue: Cue) {
        if let Some(sink) = self {
            sink.cue(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Cue::Place.name(), "place");
        assert_eq!(Cue::LineClear.name(), "lineClear");
        assert_eq!(Cue::GameOver.name(), "gameOver");
    }

    #[test]
    fn test_optional_sink() {
        let mut sink: Option<Vec<Cue>> = Some(Vec::new());
        sink.cue(Cue::Place);
        assert_eq!(sink, Some(vec![Cue::Place]));

        let mut none: Option<Vec<Cue>> = None;
        none.cue(Cue::GameOver);
        assert_eq!(none, None);
    }
}
