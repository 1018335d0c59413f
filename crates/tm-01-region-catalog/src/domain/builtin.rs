//! Default world catalog and category set.

use shared_types::{Category, Region};

/// (name, country, city, lat, lon)
const WORLD: &[(&str, &str, &str, f64, f64)] = &[
    ("US-East", "United States", "New York", 40.7128, -74.0060),
    ("US-West", "United States", "San Francisco", 37.7749, -122.4194),
    ("US-Central", "United States", "Chicago", 41.8781, -87.6298),
    ("Canada", "Canada", "Toronto", 43.6532, -79.3832),
    ("Brazil", "Brazil", "Sao Paulo", -23.5505, -46.6333),
    ("Argentina", "Argentina", "Buenos Aires", -34.6037, -58.3816),
    ("UK", "United Kingdom", "London", 51.5074, -0.1278),
    ("Germany", "Germany", "Frankfurt", 50.1109, 8.6821),
    ("France", "France", "Paris", 48.8566, 2.3522),
    ("Netherlands", "Netherlands", "Amsterdam", 52.3676, 4.9041),
    ("Russia", "Russia", "Moscow", 55.7558, 37.6173),
    ("Ukraine", "Ukraine", "Kyiv", 50.4501, 30.5234),
    ("Turkey", "Turkey", "Istanbul", 41.0082, 28.9784),
    ("UAE", "United Arab Emirates", "Dubai", 25.2048, 55.2708),
    ("India", "India", "Mumbai", 19.0760, 72.8777),
    ("China-East", "China", "Shanghai", 31.2304, 121.4737),
    ("China-North", "China", "Beijing", 39.9042, 116.4074),
    ("Japan", "Japan", "Tokyo", 35.6762, 139.6503),
    ("South Korea", "South Korea", "Seoul", 37.5665, 126.9780),
    ("Singapore", "Singapore", "Singapore", 1.3521, 103.8198),
    ("Australia", "Australia", "Sydney", -33.8688, 151.2093),
    ("South Africa", "South Africa", "Johannesburg", -26.2041, 28.0473),
    ("Nigeria", "Nigeria", "Lagos", 6.5244, 3.3792),
    ("Egypt", "Egypt", "Cairo", 30.0444, 31.2357),
];

/// (label, colour token)
const CATEGORIES: &[(&str, &str)] = &[
    ("DDoS", "#ef4444"),
    ("Malware", "#f97316"),
    ("Phishing", "#eab308"),
    ("Ransomware", "#a855f7"),
    ("Brute Force", "#3b82f6"),
    ("SQL Injection", "#14b8a6"),
    ("XSS", "#ec4899"),
    ("Botnet", "#22c55e"),
];

pub fn builtin_regions() -> Vec<Region> {
    WORLD
        .iter()
        .map(|&(name, country, city, lat, lon)| Region::new(name, country, city, lat, lon))
        .collect()
}

pub fn builtin_categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|&(label, color)| Category::new(label, color))
        .collect()
}
