//! Latent vectors passed between the engine and the RNBO patch.
//!
//! Every block the engine hands its current latents to the page. The page
//! forwards them to RNBO as a `latents_in` message and writes back whatever
//! the patch last sent on `latents_out`.

pub const LATENTS_OUT_TAG: &str = "latents_out";
pub const LATENTS_IN_TAG: &str = "latents_in";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LatentExchange {
    current: Vec<f32>,
}

impl LatentExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest latents received from the patch.
    pub fn current(&self) -> &[f32] {
        &self.current
    }

    /// Handle a device message; returns `true` when it carried latents.
    pub fn receive(&mut self, tag: &str, payload: &[f32]) -> bool {
        if tag != LATENTS_OUT_TAG {
            return false;
        }
        self.current.clear();
        self.current.extend_from_slice(payload);
        true
    }

    /// Overwrite the leading engine latents with the patch's values.
    pub fn merge_into(&self, engine_latents: &mut [f32]) -> usize {
        let n = engine_latents.len().min(self.current.len());
        engine_latents[..n].copy_from_slice(&self.current[..n]);
        n
    }
}
