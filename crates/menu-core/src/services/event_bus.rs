use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum MenuEvent {
    UploadProgress { item_id: String, image_path: String, percent: f64 },
    ItemCreated { item_id: String },
    ItemUpdated { item_id: String, image_replaced: bool },
    ItemDeleted { item_id: String },
    OperationFailed { item_id: String, operation: String, error: String },
}

impl MenuEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MenuEvent::UploadProgress { .. } => "upload_progress",
            MenuEvent::ItemCreated { .. } => "item_created",
            MenuEvent::ItemUpdated { .. } => "item_updated",
            MenuEvent::ItemDeleted { .. } => "item_deleted",
            MenuEvent::OperationFailed { .. } => "operation_failed",
        }
    }
}

pub struct EventBus {
    tx: broadcast::Sender<MenuEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: MenuEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!("Event dropped (no subscribers): {}", e.0.name());
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MenuEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(MenuEvent::ItemDeleted { item_id: "1".into() });
        assert_eq!(rx.recv().await.unwrap(), MenuEvent::ItemDeleted { item_id: "1".into() });
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new(0);
        bus.publish(MenuEvent::ItemCreated { item_id: "1".into() });
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = MenuEvent::ItemUpdated { item_id: "1".into(), image_replaced: true };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "item_updated");
        assert_eq!(json["payload"]["image_replaced"], true);
    }
}
