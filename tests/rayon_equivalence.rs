#![cfg(feature = "rayon")]

use pyrmatch::{CpuKernel, ImageView, Kernel, MatchMethod, Matcher, SearchConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_noise(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width * height).map(|_| rng.random::<u8>()).collect()
}

#[test]
fn parallel_responses_are_identical_for_every_method() {
    let scene = make_noise(90, 70, 1);
    let tpl = make_noise(13, 9, 2);
    let scene_view = ImageView::from_slice(&scene, 90, 70).unwrap();
    let tpl_view = ImageView::from_slice(&tpl, 13, 9).unwrap();

    let seq = CpuKernel::new();
    let par = CpuKernel::parallel();
    for method in MatchMethod::ALL {
        let a = seq.correlate(scene_view, tpl_view, method).unwrap();
        let b = par.correlate(scene_view, tpl_view, method).unwrap();
        assert_eq!((a.width(), a.height()), (78, 62));
        assert_eq!(a, b, "{}", method.name());
    }
}

#[test]
fn parallel_search_matches_sequential() {
    let scene = make_noise(160, 120, 3);
    let scene_view = ImageView::from_slice(&scene, 160, 120).unwrap();
    let tpl_view = scene_view.roi(48, 20, 32, 28).unwrap();

    let cfg = SearchConfig::default();
    let seq = Matcher::new().with_config(cfg.clone());
    let par = Matcher::with_kernel(CpuKernel::parallel()).with_config(cfg);

    let a = seq.search(scene_view, tpl_view).unwrap();
    let b = par.search(scene_view, tpl_view).unwrap();
    assert_eq!(a.state, b.state);
    assert_eq!(a.matched, b.matched);
    let found = a.matched.unwrap();
    assert_eq!((found.x, found.y), (48, 20));
}
