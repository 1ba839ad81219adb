use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

struct RouteEntry {
    path: &'static str,
    summary: &'static str,
}

const STATIC_ROUTES: [RouteEntry; 3] = [
    RouteEntry {
        path: "/api/v1.0/precipitation",
        summary: "Precipitation for the last twelve months of the dataset, across all stations",
    },
    RouteEntry {
        path: "/api/v1.0/stations",
        summary: "Every weather station with its location and elevation",
    },
    RouteEntry {
        path: "/api/v1.0/tobs",
        summary: "Temperatures for the last twelve months recorded by one station",
    },
];

const DYNAMIC_ROUTES: [RouteEntry; 2] = [
    RouteEntry {
        path: "/api/v1.0/<start>",
        summary: "Daily TMIN, TMAX and TAVG for every date from start onward",
    },
    RouteEntry {
        path: "/api/v1.0/<start>/<end>",
        summary: "Daily TMIN, TMAX and TAVG between start and end inclusive",
    },
];

pub fn home_page(api_base: &str, reference_station: &str) -> Markup {
    let config = PageConfig {
        title: "Hawaii Climate API",
        api_base,
    };

    base(&config, content(api_base, reference_station))
}

fn content(api_base: &str, reference_station: &str) -> Markup {
    html! {
        div class="content" {
            p {
                "Daily precipitation and temperature observations from weather stations across Hawaii. "
                "The twelve month routes count back one year from the latest date in the data, "
                "not from today."
            }

            h2 class="subtitle" { "Static routes" }
            (route_table(api_base, &STATIC_ROUTES))
            p class="is-size-7" {
                "The temperature route reports station " code { (reference_station) }
                " unless a " code { "?station=<code>" } " query parameter names another."
            }

            h2 class="subtitle" { "Dynamic routes" }
            (route_table(api_base, &DYNAMIC_ROUTES))
            p class="is-size-7" {
                "Dates use the format " code { "YYYY-MM-DD" } ". "
                "Bad input is answered with " code { "{\"Error\": \"...\"}" } "."
            }
        }
    }
}

fn route_table(api_base: &str, routes: &[RouteEntry]) -> Markup {
    html! {
        table class="table is-fullwidth is-striped" {
            thead {
                tr {
                    th { "Route" }
                    th { "Returns" }
                }
            }
            tbody {
                @for route in routes {
                    tr {
                        td {
                            @if route.path.contains('<') {
                                code { (route.path) }
                            } @else {
                                a href={ (api_base) (route.path) } { code { (route.path) } }
                            }
                        }
                        td { (route.summary) }
                    }
                }
            }
        }
    }
}
