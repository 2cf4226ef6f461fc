use wasm_bindgen_test::*;

use dirmap_wasm::{clean_birthplace, radius_for_zoom};

#[wasm_bindgen_test]
fn cleans_birthplaces() {
    #[cfg(target_arch = "wasm32")]
    dirmap_wasm::start();

    assert_eq!(clean_birthplace("[1] Berlin, West Germany"), "Berlin, Germany");
    assert_eq!(clean_birthplace("Kyiv, Ukrainian SSR, USSR"), "Kyiv");
}

#[wasm_bindgen_test]
fn radius_follows_zoom() {
    assert_eq!(radius_for_zoom(3.0), 150_000.0);
    assert_eq!(radius_for_zoom(12.0), 1_500.0);
}
