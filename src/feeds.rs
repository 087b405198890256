//! News and broker inputs to the brief.
//!
//! Both are fixed stand-ins behind small traits so a real provider can be
//! dropped in without touching the brief assembly.

use crate::models::{BrokerStatus, NewsItem, NewsSnapshot};
use tracing::debug;

pub trait NewsSource {
    fn scan(&self, region: &str, window: &str) -> NewsSnapshot;
}

pub trait BrokerProbe {
    fn status(&self) -> BrokerStatus;
}

/// Fixed two-headline macro snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticNews;

impl NewsSource for StaticNews {
    fn scan(&self, region: &str, window: &str) -> NewsSnapshot {
        debug!(region, window, "Serving static news snapshot");
        NewsSnapshot {
            region: region.to_string(),
            window: window.to_string(),
            items: vec![
                NewsItem {
                    headline: "Fed officials: 'higher for longer' on the table".to_string(),
                    tags: vec!["rates".to_string(), "fed".to_string()],
                    impact: "medium".to_string(),
                },
                NewsItem {
                    headline: "NASDAQ green in the afternoon".to_string(),
                    tags: vec!["tech".to_string(), "equities".to_string()],
                    impact: "low".to_string(),
                },
            ],
        }
    }
}

/// Broker probe with no live connection.
#[derive(Debug, Clone)]
pub struct OfflineBroker {
    pub broker: String,
}

impl Default for OfflineBroker {
    fn default() -> Self {
        Self {
            broker: "alpaca".to_string(),
        }
    }
}

impl BrokerProbe for OfflineBroker {
    fn status(&self) -> BrokerStatus {
        BrokerStatus {
            broker: self.broker.clone(),
            connected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_news_echoes_region_and_window() {
        let snap = StaticNews.scan("eu", "24h");
        assert_eq!(snap.region, "eu");
        assert_eq!(snap.window, "24h");
        assert_eq!(snap.items.len(), 2);
        assert!(snap.items[0].tags.contains(&"fed".to_string()));
    }

    #[test]
    fn test_offline_broker() {
        let status = OfflineBroker::default().status();
        assert_eq!(status.broker, "alpaca");
        assert!(!status.connected);
    }
}
