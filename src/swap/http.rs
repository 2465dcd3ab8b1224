use crate::{
    page::Fragment,
    swap::{PartialSwap, SwapMethod},
    MapError, Result,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use reqwest::{Client, Url};
use std::time::Duration;
use tokio::runtime::Handle;

/// Fetches fragments over HTTP the way htmx would and reports them on a
/// channel, to be applied with [`StaticPage::apply_fragment`](crate::page::StaticPage::apply_fragment)
pub struct HttpSwap {
    client: Client,
    base_url: Url,
    handle: Handle,
    fragments: Sender<Fragment>,
}

impl HttpSwap {
    pub fn new(base_url: &str, handle: Handle) -> Result<(Self, Receiver<Fragment>)> {
        let base_url =
            Url::parse(base_url).map_err(|e| MapError::Swap(format!("bad base url: {}", e)))?;
        let client = Client::builder()
            .user_agent(concat!("geocad-map/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        let (fragments, receiver) = unbounded();

        Ok((
            Self {
                client,
                base_url,
                handle,
                fragments,
            },
            receiver,
        ))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl PartialSwap for HttpSwap {
    fn ajax(&self, method: SwapMethod, path: &str, target: &str) -> Result<()> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| MapError::Swap(format!("bad path `{}`: {}", path, e)))?;
        let request = match method {
            SwapMethod::Get => self.client.get(url.clone()),
            SwapMethod::Post => self.client.post(url.clone()),
        }
        .header("HX-Request", "true")
        .header("HX-Target", target.trim_start_matches('#'));

        let target = target.to_string();
        let fragments = self.fragments.clone();

        log::debug!("{} {} -> {}", method, url, target);
        self.handle.spawn(async move {
            let body = match request.send().await.and_then(|r| r.error_for_status()) {
                Ok(response) => response.text().await,
                Err(e) => Err(e),
            };
            match body {
                Ok(body) => {
                    if fragments.send(Fragment { target, body }).is_err() {
                        log::warn!("fragment for {} dropped, receiver gone", url);
                    }
                }
                Err(e) => log::warn!("partial swap {} failed: {}", url, e),
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_bad_base_url() {
        let result = HttpSwap::new("not a url", Handle::current());
        assert!(matches!(result, Err(MapError::Swap(_))));
    }

    #[tokio::test]
    async fn test_joins_paths_on_base() {
        let (swap, _fragments) =
            HttpSwap::new("http://127.0.0.1:9/geocad/", Handle::current()).unwrap();
        assert_eq!(swap.base_url().as_str(), "http://127.0.0.1:9/geocad/");
        assert!(swap.ajax(SwapMethod::Get, "drawing/1/", "#nav-card").is_ok());
    }
}
