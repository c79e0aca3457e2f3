use crate::events::PreviewEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

pub fn start_background_services(tx: Sender<PreviewEvent>, config_path: PathBuf) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create Tokio runtime");

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::input::run_input_reader(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx, config_path).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
