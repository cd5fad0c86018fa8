use crate::executor::error::SendError;

/// Request ids on the current trigger path, outermost first.
#[derive(Debug, Default)]
pub(crate) struct SendChain {
    visited: Vec<String>,
}

impl SendChain {
    pub(crate) fn depth(&self) -> usize {
        self.visited.len().saturating_sub(1)
    }

    /// Pushes `request_id`, failing if it is already on the path or the path
    /// would exceed `max_depth` trigger hops.
    pub(crate) fn enter(&mut self, request_id: &str, max_depth: usize) -> Result<(), SendError> {
        if self.visited.iter().any(|id| id == request_id) {
            let mut chain = self.visited.clone();
            chain.push(request_id.to_string());
            return Err(SendError::CycleDetected { chain });
        }
        if self.visited.len() > max_depth {
            return Err(SendError::DepthExceeded { max_depth });
        }
        self.visited.push(request_id.to_string());
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.visited.pop();
    }
}
