use heater::HeaterSnapshot;
use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    StaticSegment,
};

use std::fmt::Display;

use crate::components::{Heater, TemperatureGraph};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[cfg(feature = "ssr")]
fn registry() -> Result<crate::state::HeaterRegistry, ServerFnError> {
    use_context::<crate::state::HeaterRegistry>()
        .ok_or_else(|| ServerFnError::new("heater registry not provided"))
}

#[cfg(feature = "ssr")]
fn command_failed(e: heater::HeaterError) -> ServerFnError {
    log::warn!("Heater command failed: {}", e);
    ServerFnError::new(e)
}

/// Outcome of the most recently completed heater command.
///
/// A later success clears an earlier failure, whichever action either came from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LastCommand {
    error: Option<String>,
}

impl LastCommand {
    pub fn record<T, E: Display>(&mut self, result: &Result<T, E>) {
        self.error = result.as_ref().err().map(ToString::to_string);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Current display state of every heater.
#[server]
pub async fn list_heaters() -> Result<Vec<HeaterSnapshot>, ServerFnError> {
    Ok(registry()?.snapshots())
}

/// Raise (`up`) or lower the target temperature of heater `id` by one step.
#[server]
pub async fn step_temperature(id: String, up: bool) -> Result<(), ServerFnError> {
    log::info!("{}: temperature {}", id, if up { "up" } else { "down" });
    let registry = registry()?;
    let heater = registry.get(&id).map_err(command_failed)?;
    let result = if up {
        heater.increase_temp()
    } else {
        heater.decrease_temp()
    };
    result.map(|_| ()).map_err(command_failed)
}

#[server]
pub async fn toggle_light(id: String) -> Result<(), ServerFnError> {
    log::info!("{}: toggle light", id);
    let registry = registry()?;
    let heater = registry.get(&id).map_err(command_failed)?;
    heater.toggle_light().map(|_| ()).map_err(command_failed)
}

#[server]
pub async fn toggle_power(id: String) -> Result<(), ServerFnError> {
    log::info!("{}: toggle power", id);
    let registry = registry()?;
    let heater = registry.get(&id).map_err(command_failed)?;
    heater.toggle_power().map(|_| ()).map_err(command_failed)
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        // injects a stylesheet into the document <head>
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/heater-panel.css"/>

        <Title text="Heater Panel"/>

        <Router>
            <main>
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=StaticSegment("") view=HomePage/>
                </Routes>
            </main>
        </Router>
    }
}

/// Owns the heater state and hands it to one card per heater.
#[component]
fn HomePage() -> impl IntoView {
    let step = ServerAction::<StepTemperature>::new();
    let light = ServerAction::<ToggleLight>::new();
    let power = ServerAction::<TogglePower>::new();

    // Refetch after every completed command
    let heaters = Resource::new(
        move || (step.version().get(), light.version().get(), power.version().get()),
        |_| list_heaters(),
    );

    let last_command = RwSignal::new(LastCommand::default());
    for value in [step.value(), light.value(), power.value()] {
        Effect::new(move |_| {
            value.with(|result| {
                if let Some(result) = result {
                    last_command.update(|last| last.record(result));
                }
            });
        });
    }
    let command_error = move || last_command.with(|last| last.error().map(str::to_string));

    view! {
        <div class="dashboard">
            <header class="dashboard-header">
                <h1>"Heaters"</h1>
            </header>

            {move || command_error().map(|message| view! { <p class="error">{message}</p> })}

            <Suspense fallback=move || view! { <p class="no-data">"Loading heaters..."</p> }>
                <div class="heater-grid">
                    {move || Suspend::new(async move {
                        match heaters.await {
                            Ok(snapshots) if snapshots.is_empty() => {
                                view! { <p class="no-data">"No heaters configured."</p> }.into_any()
                            }
                            Ok(snapshots) => snapshots
                                .into_iter()
                                .map(|snapshot| view! { <HeaterCard snapshot=snapshot step=step light=light power=power/> })
                                .collect_view()
                                .into_any(),
                            Err(e) => view! { <p class="error">{e.to_string()}</p> }.into_any(),
                        }
                    })}
                </div>
            </Suspense>
        </div>
    }
}

/// One heater: online/power badges, power toggle, the control panel and its
/// temperature history.
#[component]
fn HeaterCard(
    snapshot: HeaterSnapshot,
    step: ServerAction<StepTemperature>,
    light: ServerAction<ToggleLight>,
    power: ServerAction<TogglePower>,
) -> impl IntoView {
    let HeaterSnapshot {
        id,
        name,
        set_temp,
        current_temp,
        is_light_on,
        is_on,
        is_online,
        history,
    } = snapshot;

    let increase_temp: Callback<()> = {
        let id = id.clone();
        Callback::new(move |_| {
            step.dispatch(StepTemperature {
                id: id.clone(),
                up: true,
            });
        })
    };
    let decrease_temp: Callback<()> = {
        let id = id.clone();
        Callback::new(move |_| {
            step.dispatch(StepTemperature {
                id: id.clone(),
                up: false,
            });
        })
    };
    let toggle_light: Callback<()> = {
        let id = id.clone();
        Callback::new(move |_| {
            light.dispatch(ToggleLight { id: id.clone() });
        })
    };

    // Nothing to show on the dial until the heater has reported once
    let panel = match (set_temp, current_temp) {
        (Some(set_temp), Some(current_temp)) => view! {
            <Heater
                name=name
                set_temp=set_temp
                current_temp=current_temp
                is_light_on=is_light_on
                increase_temp=increase_temp
                decrease_temp=decrease_temp
                toggle_light=toggle_light
            />
        }
        .into_any(),
        _ => view! {
            <div class="heater unknown">
                <h1>{name}</h1>
                <p class="no-data">"Temperature unknown"</p>
            </div>
        }
        .into_any(),
    };

    view! {
        <section class="heater-card" class:offline={!is_online}>
            <div class="status-badges">
                <span class="badge" class:ok=is_online>
                    {if is_online { "● Online" } else { "● Offline" }}
                </span>
                <span class="badge" class:ok=is_on>
                    {if is_on { "● On" } else { "● Off" }}
                </span>
                <button
                    class="power-button"
                    disabled={!is_online}
                    on:click=move |_| {
                        power.dispatch(TogglePower { id: id.clone() });
                    }
                >
                    {if is_on { "Turn Off" } else { "Turn On" }}
                </button>
            </div>

            {panel}

            <TemperatureGraph history=history/>
        </section>
    }
}

/// 404 - Not Found
#[component]
fn NotFound() -> impl IntoView {
    // set an HTTP status code 404
    #[cfg(feature = "ssr")]
    {
        if let Some(response) = use_context::<leptos_axum::ResponseOptions>() {
            response.set_status(axum::http::StatusCode::NOT_FOUND);
        }
    }

    view! {
        <Title text="Not Found | Heater Panel"/>
        <div class="container not-found">
            <h1>"404 - Not Found"</h1>
            <p>"The page you requested could not be found."</p>
            <a href="/">"Return to Heaters"</a>
        </div>
    }
}
