//! Canvases and plotted fields per category.

use crate::category::Category;

#[derive(Debug, Clone, Copy)]
pub struct SeriesSpec {
    pub field: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub canvas_id: &'static str,
    pub title: &'static str,
    pub y_title: &'static str,
    pub series: &'static [SeriesSpec],
}

const fn series(field: &'static str, label: &'static str, color: &'static str) -> SeriesSpec {
    SeriesSpec {
        field,
        label,
        color,
    }
}

/// Row columns tried, in order, for the x value of time-series charts.
pub const TIMESTAMP_FIELDS: &[&str] = &["Timestamp", "timestamp", "time", "lastDataTime"];

pub const WAVE_SPECTRUM_CANVAS: &str = "waveSpectrumChart";

const POWER: &[ChartSpec] = &[ChartSpec {
    canvas_id: "powerChart",
    title: "Power",
    y_title: "Watts / Wh",
    series: &[
        series("BatteryWattHours", "Battery (Wh)", "#0d6efd"),
        series("SolarPowerGenerated", "Solar Input (W)", "#ffc107"),
        series("PowerDraw", "Power Draw (W)", "#dc3545"),
        series("NetPowerFlow", "Net Flow (W)", "#198754"),
    ],
}];

const SOLAR: &[ChartSpec] = &[ChartSpec {
    canvas_id: "solarChart",
    title: "Solar Panels",
    y_title: "Watts",
    series: &[
        series("panelPower1", "Panel 1", "#fd7e14"),
        series("panelPower2", "Panel 2", "#ffc107"),
        series("panelPower3", "Panel 3", "#20c997"),
        series("panelPower4", "Panel 4", "#6f42c1"),
    ],
}];

const CTD: &[ChartSpec] = &[
    ChartSpec {
        canvas_id: "ctdChart",
        title: "CTD",
        y_title: "°C / PSU",
        series: &[
            series("WaterTemperature", "Water Temp (°C)", "#dc3545"),
            series("Salinity", "Salinity (PSU)", "#0d6efd"),
            series("Conductivity", "Conductivity (S/m)", "#20c997"),
        ],
    },
    ChartSpec {
        canvas_id: "ctdOxygenChart",
        title: "Dissolved Oxygen / Pressure",
        y_title: "Hz / dbar",
        series: &[
            series("DissolvedOxygen", "Dissolved O₂", "#198754"),
            series("Pressure", "Pressure (dbar)", "#6c757d"),
        ],
    },
];

const WEATHER: &[ChartSpec] = &[ChartSpec {
    canvas_id: "weatherChart",
    title: "Weather",
    y_title: "°C / kt / mbar",
    series: &[
        series("AirTemperature", "Air Temp (°C)", "#dc3545"),
        series("WindSpeed", "Wind Speed (kt)", "#0d6efd"),
        series("GustSpeed", "Gust (kt)", "#6610f2"),
        series("BarometricPressure", "Pressure (mbar)", "#6c757d"),
    ],
}];

const WAVES: &[ChartSpec] = &[
    ChartSpec {
        canvas_id: "waveHeightChart",
        title: "Wave Height",
        y_title: "m",
        series: &[series("SignificantWaveHeight", "Hs (m)", "#0d6efd")],
    },
    ChartSpec {
        canvas_id: "wavePeriodChart",
        title: "Wave Period / Direction",
        y_title: "s / °",
        series: &[
            series("PeakPeriod", "Peak Period (s)", "#20c997"),
            series("MeanWaveDirection", "Direction (°)", "#fd7e14"),
        ],
    },
];

const FLUOROMETER: &[ChartSpec] = &[ChartSpec {
    canvas_id: "fluorometerChart",
    title: "Fluorometer",
    y_title: "ppb",
    series: &[
        series("C1_Avg", "Chlorophyll", "#198754"),
        series("C2_Avg", "Phycocyanin", "#0dcaf0"),
        series("C3_Avg", "CDOM", "#6f42c1"),
        series("Temperature", "Temp (°C)", "#dc3545"),
    ],
}];

const VR2C: &[ChartSpec] = &[ChartSpec {
    canvas_id: "vr2cChart",
    title: "VR2C Detections",
    y_title: "Count",
    series: &[
        series("DetectionCount", "Detections", "#0d6efd"),
        series("PingCount", "Pings", "#6c757d"),
    ],
}];

const WG_VM4: &[ChartSpec] = &[ChartSpec {
    canvas_id: "wgVm4Chart",
    title: "WG-VM4 Detections",
    y_title: "Count",
    series: &[
        series("Channel0DetectionCount", "Channel 0", "#0d6efd"),
        series("Channel1DetectionCount", "Channel 1", "#fd7e14"),
    ],
}];

const TELEMETRY: &[ChartSpec] = &[
    ChartSpec {
        canvas_id: "navigationSpeedChart",
        title: "Speed",
        y_title: "kt",
        series: &[
            series("SpeedOverGround", "SOG (kt)", "#0d6efd"),
            series("OceanCurrentSpeed", "Current (kt)", "#20c997"),
        ],
    },
    ChartSpec {
        canvas_id: "navigationHeadingChart",
        title: "Heading",
        y_title: "°",
        series: &[
            series("Heading", "Heading (°)", "#fd7e14"),
            series("DesiredHeading", "Desired (°)", "#6c757d"),
        ],
    },
];

/// Charts drawn by a category's loader. Aliased panels own no charts themselves.
#[must_use]
pub fn chart_specs(category: Category) -> &'static [ChartSpec] {
    match category {
        Category::Power => POWER,
        Category::Solar => SOLAR,
        Category::Ctd => CTD,
        Category::Weather => WEATHER,
        Category::Waves => WAVES,
        Category::Fluorometer => FLUOROMETER,
        Category::Vr2c => VR2C,
        Category::WgVm4 => WG_VM4,
        Category::Telemetry => TELEMETRY,
        Category::Navigation => &[],
    }
}
