use leptos::prelude::*;

mod styles {
    pub const CONTAINER: &str = "text-align: center; padding: 20px; max-width: 300px; \
        margin: 0 auto; border: 1px solid #ccc; border-radius: 10px; background-color: #f9f9f9;";
    pub const TEMP_DISPLAY: &str = "margin-bottom: 20px;";
    pub const BUTTON_CONTAINER: &str = "margin-bottom: 20px;";
    pub const BUTTON: &str = "font-size: 18px; padding: 10px 20px; margin: 0 10px; \
        background-color: #007BFF; color: white; border: none; border-radius: 5px; cursor: pointer;";
    pub const LIGHT_CONTROL: &str = "margin-top: 20px;";
}

/// Every piece of text the heater view shows, derived from its props.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaterLabels {
    pub heading: String,
    pub set_temp: String,
    pub current_temp: String,
    pub light_button: &'static str,
    pub light_status: &'static str,
}

impl HeaterLabels {
    pub fn project(name: &str, set_temp: f64, current_temp: f64, is_light_on: bool) -> Self {
        HeaterLabels {
            heading: name.to_string(),
            set_temp: format!("Set Temperature: {}°C", set_temp),
            current_temp: format!("Current Temperature: {}°C", current_temp),
            // Button and status text both follow `is_light_on`
            light_button: if is_light_on {
                "Turn Off Light"
            } else {
                "Turn On Light"
            },
            light_status: if is_light_on {
                "Light is ON"
            } else {
                "Light is OFF"
            },
        }
    }
}

/// The three buttons of the heater view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterButton {
    Increase,
    Decrease,
    ToggleLight,
}

/// The temperature buttons in display order, with the button each one presses.
pub const TEMP_BUTTONS: [(&str, HeaterButton); 2] = [
    ("↑", HeaterButton::Increase),
    ("↓", HeaterButton::Decrease),
];

/// Caller supplied triggers, one per button.
#[derive(Clone, Copy)]
pub struct HeaterActions {
    pub increase_temp: Callback<()>,
    pub decrease_temp: Callback<()>,
    pub toggle_light: Callback<()>,
}

impl HeaterActions {
    /// Forward a single press to its trigger.
    pub fn press(&self, button: HeaterButton) {
        match button {
            HeaterButton::Increase => self.increase_temp.run(()),
            HeaterButton::Decrease => self.decrease_temp.run(()),
            HeaterButton::ToggleLight => self.toggle_light.run(()),
        }
    }
}

/// Heater control panel: temperatures, up/down buttons and a light toggle.
///
/// Holds no state of its own. Everything shown comes from the props and every
/// click goes straight to the matching callback.
#[component]
pub fn Heater(
    #[prop(into)] name: Signal<String>,
    #[prop(into)] set_temp: Signal<f64>,
    #[prop(into)] current_temp: Signal<f64>,
    #[prop(into)] is_light_on: Signal<bool>,
    #[prop(into)] increase_temp: Callback<()>,
    #[prop(into)] decrease_temp: Callback<()>,
    #[prop(into)] toggle_light: Callback<()>,
) -> impl IntoView {
    let labels = Memo::new(move |_| {
        HeaterLabels::project(
            &name.get(),
            set_temp.get(),
            current_temp.get(),
            is_light_on.get(),
        )
    });
    let actions = HeaterActions {
        increase_temp,
        decrease_temp,
        toggle_light,
    };

    view! {
        <div class="heater" style=styles::CONTAINER>
            <h1>{move || labels.with(|l| l.heading.clone())}</h1>
            <div style=styles::TEMP_DISPLAY>
                <div>
                    <h2>{move || labels.with(|l| l.set_temp.clone())}</h2>
                    <h3>{move || labels.with(|l| l.current_temp.clone())}</h3>
                </div>
            </div>

            <div style=styles::BUTTON_CONTAINER>
                {TEMP_BUTTONS
                    .iter()
                    .map(|&(label, button)| {
                        view! {
                            <button style=styles::BUTTON on:click=move |_| actions.press(button)>
                                {label}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <div style=styles::LIGHT_CONTROL>
                <button style=styles::BUTTON on:click=move |_| actions.press(HeaterButton::ToggleLight)>
                    {move || labels.with(|l| l.light_button)}
                </button>
                <p>{move || labels.with(|l| l.light_status)}</p>
            </div>
        </div>
    }
}
