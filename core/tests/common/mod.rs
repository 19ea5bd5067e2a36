#![allow(dead_code)]

use adminrest_core::{AdminRestClient, ServiceOptions};
use axum::Router;

/// Start `router` on a random local port and return its base URL.
///
/// The listener is bound before the server thread starts, so requests made
/// right after this returns queue up instead of being refused.
pub fn spawn(router: Router) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::serve(listener, router).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

pub fn client_for(url: &str) -> AdminRestClient {
    AdminRestClient::new(ServiceOptions::new().url(url)).unwrap()
}
