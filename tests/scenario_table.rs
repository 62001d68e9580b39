//! Table-driven search scenarios over seeded noise scenes.

use pyrmatch::{ImageView, MatchMethod, Matcher, SearchConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

const SCENARIOS: &str = r#"[
  { "name": "default_square", "scene": [100, 100], "template": [30, 40, 20, 20],
    "expect": { "start_level": 1, "found": [30, 40] } },
  { "name": "large_template_escalates_early", "scene": [200, 160], "template": [64, 32, 64, 48],
    "expect": { "start_level": 2, "found": [64, 32], "level": 1 } },
  { "name": "foreign_template", "scene": [100, 100], "template": [0, 0, 20, 20], "template_seed": 99,
    "expect": { "start_level": 1 } },
  { "name": "tiny_template_refused", "scene": [30, 30], "template": [6, 8, 12, 12],
    "expect": { "start_level": 0 } },
  { "name": "tiny_template_level_zero", "scene": [30, 30], "template": [6, 8, 12, 12],
    "search_level_zero": true,
    "expect": { "start_level": 0, "found": [6, 8], "level": 0 } },
  { "name": "normalized_cross_correlation", "scene": [100, 100], "template": [30, 40, 20, 20],
    "method": "ccorr_normed",
    "expect": { "start_level": 1, "found": [30, 40] } },
  { "name": "normalized_squared_difference", "scene": [100, 100], "template": [30, 40, 20, 20],
    "method": "sqdiff_normed", "weak_threshold": -0.25, "strict_threshold": -0.05,
    "expect": { "start_level": 1, "found": [30, 40] } }
]"#;

#[derive(Debug, Deserialize)]
struct Expectation {
    start_level: usize,
    #[serde(default)]
    found: Option<[usize; 2]>,
    #[serde(default)]
    level: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    scene: [usize; 2],
    /// `[x, y, width, height]` of the patch cut from the scene.
    template: [usize; 4],
    /// Generate the template from this seed instead of cutting it out.
    #[serde(default)]
    template_seed: Option<u64>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    weak_threshold: Option<f32>,
    #[serde(default)]
    strict_threshold: Option<f32>,
    #[serde(default)]
    search_level_zero: bool,
    expect: Expectation,
}

impl Scenario {
    fn config(&self) -> SearchConfig {
        let defaults = SearchConfig::default();
        let method = match self.method.as_deref() {
            None => defaults.method,
            Some(name) => MatchMethod::ALL
                .into_iter()
                .find(|m| m.name() == name)
                .unwrap_or_else(|| panic!("{}: unknown method {name}", self.name)),
        };
        SearchConfig {
            method,
            weak_threshold: self.weak_threshold.unwrap_or(defaults.weak_threshold),
            strict_threshold: self.strict_threshold.unwrap_or(defaults.strict_threshold),
            search_level_zero: self.search_level_zero,
            ..defaults
        }
    }
}

fn make_noise(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width * height).map(|_| rng.random::<u8>()).collect()
}

#[test]
fn scenarios_match_expectations() {
    let scenarios: Vec<Scenario> = serde_json::from_str(SCENARIOS).unwrap();
    assert!(!scenarios.is_empty());

    for scenario in &scenarios {
        let [scene_w, scene_h] = scenario.scene;
        let [tx, ty, tw, th] = scenario.template;
        let scene = make_noise(scene_w, scene_h, 42);
        let tpl = match scenario.template_seed {
            Some(seed) => make_noise(tw, th, seed),
            None => {
                let scene_view = ImageView::from_slice(&scene, scene_w, scene_h).unwrap();
                let patch = scene_view.roi(tx, ty, tw, th).unwrap();
                (0..th).flat_map(|y| patch.row(y).unwrap().to_vec()).collect()
            }
        };
        let scene_view = ImageView::from_slice(&scene, scene_w, scene_h).unwrap();
        let tpl_view = ImageView::from_slice(&tpl, tw, th).unwrap();

        let matcher = Matcher::new().with_config(scenario.config());
        let outcome = matcher.search(scene_view, tpl_view).unwrap();
        assert_eq!(
            outcome.start_level, scenario.expect.start_level,
            "{}: start level",
            scenario.name
        );

        let found = outcome.matched.map(|m| [m.x, m.y]);
        assert_eq!(found, scenario.expect.found, "{}: location", scenario.name);
        if let (Some(level), Some(m)) = (scenario.expect.level, outcome.matched) {
            assert_eq!(m.level, level, "{}: accepting level", scenario.name);
        }
    }
}
