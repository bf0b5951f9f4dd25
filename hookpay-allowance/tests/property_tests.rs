//! Property-based tests for hookpay-allowance

#[cfg(test)]
mod codec_properties {
    use hookpay_allowance::{
        build_allowance_message, encode_payment_payload, next_allowance_cap, sign_allowance,
        AllowanceRecord, HookMemo, PaymentRequest,
    };
    use hookpay_lib::{Amount, Ed25519MessageSigner, MessageSigner};
    use proptest::prelude::*;

    fn address() -> impl Strategy<Value = String> {
        "r[1-9A-HJ-NP-Za-km-z]{24,34}"
    }

    proptest! {
        /// Message is exactly payer:payee:cap
        #[test]
        fn message_layout(payer in address(), payee in address(), cap in 0u64..1_000_000_000u64) {
            let record = AllowanceRecord::parse(&payer, &payee, &cap.to_string()).unwrap();
            let expected = format!("{}:{}:{}", payer, payee, cap);
            prop_assert_eq!(build_allowance_message(&record), expected.into_bytes());
        }

        /// Cap top-ups are exact integer sums
        #[test]
        fn top_up_exact(remaining in 0i64..1_000_000_000i64, top_up in 0i64..1_000_000_000i64) {
            let cap = next_allowance_cap(&Amount::from_units(remaining), &Amount::from_units(top_up)).unwrap();
            prop_assert_eq!(cap.to_string(), (remaining + top_up).to_string());
        }

        /// Every signed authorization verifies and survives a payment memo
        #[test]
        fn signed_payment_round_trip(
            key in any::<[u8; 32]>(),
            payer in address(),
            payee in address(),
            cap in 1i64..1_000_000i64,
            amount in 1i64..1_000_000i64,
        ) {
            let signer = Ed25519MessageSigner::from_bytes(&key);
            let record = AllowanceRecord::parse(&payer, &payee, &cap.to_string()).unwrap();
            let auth = sign_allowance(&record, Some(&signer)).unwrap();
            prop_assert!(auth.verify_ed25519(&signer.public_key_hex()).unwrap());

            let request = PaymentRequest::new(auth.clone(), Amount::from_units(amount));
            let decoded = encode_payment_payload(&request).unwrap().decode().unwrap();
            match decoded {
                HookMemo::AllowancePayment { user_address, payment_amount, allowance } => {
                    prop_assert_eq!(user_address.as_str(), payer.as_str());
                    prop_assert_eq!(payment_amount, Amount::from_units(amount));
                    prop_assert_eq!(allowance.amount, Amount::from_units(cap));
                    prop_assert_eq!(allowance.signature, auth.signature);
                }
                other => prop_assert!(false, "unexpected memo {:?}", other),
            }
        }
    }
}
