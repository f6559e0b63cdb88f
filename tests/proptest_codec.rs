use boxlabel::annotation::io_yolo::{decode, decode_labels, encode};
use proptest::prelude::*;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn decode_inverts_encode(
        (width, height, rects) in proptest_helpers::arb_annotated_image(12)
    ) {
        let text = encode(&rects, width, height).expect("encode");
        let restored = decode(&text, width, height);

        let eps = proptest_helpers::eps_yolo(width, height);
        let res = proptest_helpers::assert_rectangles_equivalent(&rects, &restored, eps);
        prop_assert!(res.is_ok(), "{}", res.unwrap_err());
    }

    #[test]
    fn encoded_fields_stay_normalized(
        (width, height, rects) in proptest_helpers::arb_annotated_image(12)
    ) {
        let text = encode(&rects, width, height).expect("encode");

        prop_assert_eq!(text.lines().count(), rects.len());
        for line in text.lines() {
            let fields: Vec<&str> = line.split(' ').collect();
            prop_assert_eq!(fields.len(), 5);
            for raw in &fields[1..] {
                let value: f64 = raw.parse().expect("numeric field");
                prop_assert!((0.0..=1.0).contains(&value), "{} out of range in '{}'", value, line);
            }
        }
    }

    #[test]
    fn reencoding_decoded_text_is_stable(
        (width, height, rects) in proptest_helpers::arb_annotated_image(8)
    ) {
        let first = encode(&rects, width, height).expect("encode");
        let second = encode(&decode(&first, width, height), width, height).expect("re-encode");
        let first_rows: Vec<Vec<f64>> = rows(&first);
        let second_rows: Vec<Vec<f64>> = rows(&second);

        prop_assert_eq!(first_rows.len(), second_rows.len());
        for (a, b) in first_rows.iter().zip(&second_rows) {
            for (x, y) in a.iter().zip(b) {
                prop_assert!((x - y).abs() <= 1.5e-6, "{} vs {}", x, y);
            }
        }
    }

    #[test]
    fn decode_never_panics_on_arbitrary_text(text in ".{0,400}") {
        let decoded = decode_labels(&text, 640, 480);
        prop_assert!(decoded.rectangles.len() <= text.lines().count());
    }
}

fn rows(text: &str) -> Vec<Vec<f64>> {
    text.lines()
        .map(|line| {
            line.split(' ')
                .map(|field| field.parse::<f64>().expect("numeric field"))
                .collect()
        })
        .collect()
}
