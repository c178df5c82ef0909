use std::sync::Arc;

use trackgate_output::{Gt06Protocol, OutputProcessor, OutputProtocol};
use trackgate_session::SessionsManager;
use trackgate_store::{DeviceStateRepo, InMemoryStore, KvStore};

use crate::config::{Config, StoreBackend};

/// Explicitly constructed application context (Design Notes: "global
/// singletons" replaced by a context passed into sessions and workers,
/// removing hidden initialization-order dependencies between
/// `redis_client`/`output_mappers`/`output_processor`).
pub struct AppContext {
    pub store: DeviceStateRepo,
    pub sessions: SessionsManager,
    pub output: OutputProcessor,
}

impl AppContext {
    pub async fn build(config: &Config) -> anyhow::Result<Self> {
        let kv_store: Arc<dyn KvStore> = match config.store_backend {
            StoreBackend::Memory => Arc::new(InMemoryStore::new()),
            StoreBackend::Redis => {
                #[cfg(feature = "redis")]
                {
                    Arc::new(
                        trackgate_store::RedisStore::connect(
                            &config.redis_host,
                            config.redis_port,
                            &config.redis_password,
                            config.redis_db,
                        )
                        .await?,
                    )
                }
                #[cfg(not(feature = "redis"))]
                {
                    anyhow::bail!(
                        "STORE_BACKEND=redis requires the gateway to be built with the `redis` feature"
                    );
                }
            }
        };
        let store = DeviceStateRepo::new(kv_store);

        let sessions = SessionsManager::new(config.output_protocol_host_addresses.clone(), store.clone());

        let gt06: Arc<dyn OutputProtocol> = Arc::new(
            Gt06Protocol::new(config.gt06_location_packet_protocol_number)
                .expect("config validated the protocol number against the known location variants"),
        );
        let output = OutputProcessor::new(
            vec![gt06],
            config.default_output_protocol.clone(),
            store.clone(),
            sessions.clone(),
        );

        Ok(Self {
            store,
            sessions,
            output,
        })
    }
}
