//! Partial page swaps: fetch a fragment and put it into a page region
//!
//! The controller fires a swap and never waits for it. Backends:
//! [`ChannelSwap`] only queues the request, `HttpSwap` fetches it with
//! reqwest on a tokio runtime, `HtmxSwap` hands it to htmx in the browser.

#[cfg(feature = "wasm")]
pub mod htmx;
#[cfg(feature = "tokio-runtime")]
pub mod http;

#[cfg(feature = "wasm")]
pub use htmx::HtmxSwap;
#[cfg(feature = "tokio-runtime")]
pub use http::HttpSwap;

use crate::{MapError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapMethod {
    Get,
    Post,
}

impl SwapMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapMethod::Get => "GET",
            SwapMethod::Post => "POST",
        }
    }
}

impl fmt::Display for SwapMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fire-and-forget swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub method: SwapMethod,
    pub path: String,
    /// CSS id selector of the region to replace
    pub target: String,
}

pub trait PartialSwap {
    /// Starts the swap; returning `Ok` only means it was issued
    fn ajax(&self, method: SwapMethod, path: &str, target: &str) -> Result<()>;
}

/// Queues requests on a channel for someone else to carry out
#[derive(Debug, Clone)]
pub struct ChannelSwap {
    sender: Sender<SwapRequest>,
}

impl ChannelSwap {
    pub fn new() -> (Self, Receiver<SwapRequest>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl PartialSwap for ChannelSwap {
    fn ajax(&self, method: SwapMethod, path: &str, target: &str) -> Result<()> {
        self.sender
            .send(SwapRequest {
                method,
                path: path.to_string(),
                target: target.to_string(),
            })
            .map_err(|_| MapError::Swap("swap queue closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_swap_queues_requests() {
        let (swap, requests) = ChannelSwap::new();
        swap.ajax(SwapMethod::Get, "/drawings/3/", "#nav-card")
            .unwrap();

        let request = requests.try_recv().unwrap();
        assert_eq!(request.method, SwapMethod::Get);
        assert_eq!(request.path, "/drawings/3/");
        assert_eq!(request.target, "#nav-card");
        assert!(requests.try_recv().is_err());
    }

    #[test]
    fn test_closed_queue_is_an_error() {
        let (swap, requests) = ChannelSwap::new();
        drop(requests);
        assert!(matches!(
            swap.ajax(SwapMethod::Get, "/", "#nav-card"),
            Err(MapError::Swap(_))
        ));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(SwapMethod::Get.to_string(), "GET");
        assert_eq!(SwapMethod::Post.as_str(), "POST");
    }
}
