#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> std::io::Result<()> {
    use axum::Router;
    use heater_panel::app::*;
    use heater_panel::state::{spawn_poller, HeaterRegistry, PanelSettings};
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use log::info;
    use std::io;

    // Set up logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Load configuration
    let conf = get_configuration(None).map_err(io::Error::other)?;
    let addr = conf.leptos_options.site_addr;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(App);

    // Heaters are refreshed once here, then by the poller
    let settings = PanelSettings::from_env();
    let registry = HeaterRegistry::load(&settings).map_err(io::Error::other)?;
    spawn_poller(registry.clone(), settings.heater.poll_interval());

    let app = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let registry = registry.clone();
                move || provide_context(registry.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptos_options);

    info!("Starting server at http://{}", &addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}
