//! Property tests for the palette ladder.

use proptest::prelude::*;

use swatch_core::{CONTRAST_THRESHOLD, Session, TextColor, ThemeConfig};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ladder_is_complete_for_any_seed(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let config = ThemeConfig::default();
        let mut session = Session::initialize(&config, config.build_host().unwrap()).unwrap();
        let seed = format!("#{r:02x}{g:02x}{b:02x}");
        session.commit("primary", &seed).unwrap();

        let state = session.state();
        prop_assert_eq!(&state.get("primary").unwrap().value, &seed);
        let base = state.text_colors().base;
        for category in state.current().values() {
            prop_assert_eq!(category.variants.len(), 9);
            for variant in &category.variants {
                let expected = variant.resolved.contrast_lstar(&base) > CONTRAST_THRESHOLD;
                prop_assert_eq!(variant.contrasting_text_color == TextColor::Base, expected);
            }
        }
    }
}
