/// Resume state that survives across connections.
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    session_id: Option<String>,
    resume_gateway_url: Option<String>,
    sequence: Option<u64>,
}

impl SessionInfo {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session_id: None,
            resume_gateway_url: None,
            sequence: None,
        }
    }

    pub fn set_session(&mut self, session_id: String, resume_url: Option<String>) {
        self.session_id = Some(session_id);
        self.resume_gateway_url = resume_url;
    }

    pub const fn update_sequence(&mut self, sequence: Option<u64>) {
        if let Some(seq) = sequence {
            self.sequence = Some(seq);
        }
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    #[must_use]
    pub fn resume_gateway_url(&self) -> Option<&str> {
        self.resume_gateway_url.as_deref()
    }

    #[must_use]
    pub const fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    #[must_use]
    pub const fn can_resume(&self) -> bool {
        self.session_id.is_some() && self.sequence.is_some()
    }

    pub fn clear(&mut self) {
        self.session_id = None;
        self.resume_gateway_url = None;
        self.sequence = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_can_resume() {
        let mut session = SessionInfo::new();
        assert!(!session.can_resume());

        session.set_session("test_session".into(), Some("wss://resume.url".into()));
        assert!(!session.can_resume());

        session.update_sequence(Some(42));
        session.update_sequence(None);
        assert!(session.can_resume());
        assert_eq!(session.sequence(), Some(42));
        assert_eq!(session.resume_gateway_url(), Some("wss://resume.url"));
    }

    #[test]
    fn test_session_clear() {
        let mut session = SessionInfo::new();
        session.set_session("test".into(), None);
        session.update_sequence(Some(1));

        session.clear();
        assert!(session.session_id().is_none());
        assert!(!session.can_resume());
    }
}
