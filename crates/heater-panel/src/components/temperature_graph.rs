use heater::{TemperatureHistory, TemperatureSample, GRAPH_MAX_TEMP, GRAPH_MIN_TEMP};
use leptos::prelude::*;

const WIDTH: f64 = 300.0;
const HEIGHT: f64 = 150.0;
const LABEL_GUTTER: f64 = 35.0;

const CURRENT_COLOR: &str = "#ff6633";
const SET_COLOR: &str = "#cccc33";

/// SVG `points` attribute for a series of temperatures.
fn polyline_points(values: &[f64]) -> String {
    TemperatureHistory::polyline(values, WIDTH, HEIGHT)
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scale labels from the bottom of the graph to the top, with their y offset.
fn scale_labels() -> Vec<(f64, String)> {
    let range = GRAPH_MAX_TEMP - GRAPH_MIN_TEMP;
    (0..5)
        .map(|i| {
            let temp = GRAPH_MIN_TEMP + range / 4.0 * i as f64;
            let y = HEIGHT - HEIGHT / 4.0 * i as f64;
            (y, format!("{:.0}°C", temp))
        })
        .collect()
}

/// Line chart of measured (orange) and target (yellow) temperatures.
#[component]
pub fn TemperatureGraph(#[prop(into)] history: Signal<Vec<TemperatureSample>>) -> impl IntoView {
    let current_points = move || {
        history.with(|h| polyline_points(&h.iter().map(|s| s.current).collect::<Vec<_>>()))
    };
    let set_points =
        move || history.with(|h| polyline_points(&h.iter().map(|s| s.set).collect::<Vec<_>>()));

    let grid = (1..4)
        .map(|i| {
            let y = (HEIGHT / 4.0 * i as f64).to_string();
            view! { <line x1="0" y1={y.clone()} x2={WIDTH.to_string()} y2=y stroke="#4d4d4d" stroke-width="1"/> }
        })
        .collect_view();

    let labels = scale_labels()
        .into_iter()
        .map(|(y, text)| {
            view! {
                <text x={(-LABEL_GUTTER).to_string()} y={y.to_string()} font-size="10" fill="#b3b3b3" dominant-baseline="middle">
                    {text}
                </text>
            }
        })
        .collect_view();

    view! {
        <div class="temperature-graph">
            <h4>"Temperature History"</h4>
            <svg
                viewBox={format!("{} -5 {} {}", -LABEL_GUTTER, WIDTH + LABEL_GUTTER, HEIGHT + 10.0)}
                width="100%"
            >
                <rect x="0" y="0" width={WIDTH.to_string()} height={HEIGHT.to_string()} fill="#1a1a1a"/>
                {grid}
                {labels}
                <polyline points=set_points fill="none" stroke=SET_COLOR stroke-width="2"/>
                <polyline points=current_points fill="none" stroke=CURRENT_COLOR stroke-width="2"/>
            </svg>
            <div class="legend">
                <span style={format!("color: {}", CURRENT_COLOR)}>"● Current"</span>
                <span style={format!("color: {}", SET_COLOR)}>"● Set"</span>
            </div>
        </div>
    }
}
