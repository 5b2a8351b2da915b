use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Orbit, Rocket};
use std::sync::Mutex;
use tokio::sync::{oneshot, OnceCell};

/// Creates a fairing that reports the port Rocket actually bound to, and the
/// handle that receives it. Needed when the configured port is 0.
pub fn create_pair() -> (PortSaver, Port) {
    let (tx, rx) = oneshot::channel();
    (
        PortSaver {
            sender: Mutex::new(Some(tx)),
        },
        Port {
            port: OnceCell::new(),
            rx: tokio::sync::Mutex::new(Some(rx)),
        },
    )
}

#[derive(Debug, thiserror::Error)]
#[error("The server shut down before reporting its port.")]
pub struct PortUnavailable;

pub struct Port {
    port: OnceCell<u16>,
    rx: tokio::sync::Mutex<Option<oneshot::Receiver<u16>>>,
}

impl Port {
    /// Waits for liftoff, then returns the bound port. Later calls return the
    /// cached value.
    pub async fn get(&self) -> Result<u16, PortUnavailable> {
        self.port
            .get_or_try_init(|| async move {
                let rx = self.rx.lock().await.take().ok_or(PortUnavailable)?;
                rx.await.map_err(|_| PortUnavailable)
            })
            .await
            .map(|port| *port)
    }
}

pub struct PortSaver {
    sender: Mutex<Option<oneshot::Sender<u16>>>,
}

#[rocket::async_trait]
impl Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let sender = match self.sender.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(sender) = sender {
            if sender.send(rocket.config().port).is_err() {
                tracing::warn!("Nobody was waiting for the bound port.");
            }
        }
    }
}
