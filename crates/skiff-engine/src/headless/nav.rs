//! Per-view back/forward stack for the headless engine.

/// Back/forward history of a single headless view.
#[derive(Debug, Default)]
pub struct ViewHistory {
    back_stack: Vec<String>,
    forward_stack: Vec<String>,
    current: Option<String>,
}

impl ViewHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to a new URL. Pushes the current page to the back stack,
    /// clears the forward stack.
    pub fn navigate(&mut self, url: &str) {
        if let Some(prev) = self.current.take() {
            self.back_stack.push(prev);
        }
        self.forward_stack.clear();
        self.current = Some(url.to_string());
    }

    /// Step back. Returns the URL to load, or None.
    pub fn go_back(&mut self) -> Option<String> {
        let prev = self.back_stack.pop()?;
        if let Some(current) = self.current.take() {
            self.forward_stack.push(current);
        }
        self.current = Some(prev.clone());
        Some(prev)
    }

    /// Step forward. Returns the URL to load, or None.
    pub fn go_forward(&mut self) -> Option<String> {
        let next = self.forward_stack.pop()?;
        if let Some(current) = self.current.take() {
            self.back_stack.push(current);
        }
        self.current = Some(next.clone());
        Some(next)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward_stack.is_empty()
    }
}
