//! Allowance flow tests
//!
//! Charge, redeem and withdraw against the in-memory ledger, checking the
//! transactions and memos the hook would receive.

#[cfg(test)]
mod allowance_flows {
    use hookpay_allowance::{
        sign_allowance, AllowanceError, AllowanceOperations, AllowanceRecord, HookMemo,
        TransportPayload,
    };
    use hookpay_lib::test_utils::{test_wallet, MockLedgerClient, TEST_HOOK_ACCOUNT};
    use hookpay_lib::{
        AccountAddress, Amount, Ed25519MessageSigner, HookpayError, LedgerWallet,
        MessageSigner, NetworkConfig, Transaction, TransactionType, WalletSecret,
    };

    fn config() -> NetworkConfig {
        NetworkConfig::default().with_hook_address(AccountAddress::new(TEST_HOOK_ACCOUNT))
    }

    fn operations() -> (MockLedgerClient, AllowanceOperations<MockLedgerClient>) {
        let ledger = MockLedgerClient::new();
        (ledger.clone(), AllowanceOperations::new(ledger, config()))
    }

    fn operator() -> LedgerWallet {
        LedgerWallet::new(
            AccountAddress::new("rOperator"),
            WalletSecret::new("sOperatorSecret"),
        )
    }

    fn payer_signer() -> Ed25519MessageSigner {
        Ed25519MessageSigner::from_bytes(&[11u8; 32])
    }

    fn decode_first_memo(tx: &Transaction) -> HookMemo {
        let memo = tx.first_memo().expect("transaction carries a memo");
        TransportPayload::from_memo(memo).unwrap().decode().unwrap()
    }

    #[tokio::test]
    async fn test_charge_raises_cap_by_exact_sum() {
        let (ledger, ops) = operations();
        let signer = payer_signer();
        let payee = operator().address;

        let outcome = ops
            .charge_and_update_allowance(&test_wallet(), Some(&signer), &payee, "2000", "5000")
            .await
            .unwrap();

        assert!(outcome.submission.is_success());
        assert_eq!(outcome.authorization.cap().to_string(), "7000");
        assert!(outcome
            .authorization
            .verify_ed25519(&signer.public_key_hex())
            .unwrap());

        let tx = ledger.last_submitted().unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Invoke);
        assert_eq!(tx.destination.as_ref().unwrap().as_str(), TEST_HOOK_ACCOUNT);
        assert_eq!(tx.amount.as_ref().unwrap().value, "2000");
        assert_eq!(tx.network_id, Some(21338));

        match decode_first_memo(&tx) {
            HookMemo::UpdateAllowance {
                allowance,
                signature,
            } => {
                assert_eq!(allowance, Amount::from_units(7000));
                assert_eq!(signature, outcome.authorization.signature);
            }
            other => panic!("unexpected memo {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_charge_without_signer_submits_nothing() {
        let (ledger, ops) = operations();
        let err = ops
            .charge_and_update_allowance(
                &test_wallet(),
                None,
                &operator().address,
                "2000",
                "5000",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AllowanceError::SigningUnavailable(_)));
        assert!(ledger.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_charge_rejects_fractional_amount() {
        let (ledger, ops) = operations();
        let signer = payer_signer();
        let err = ops
            .charge_and_update_allowance(
                &test_wallet(),
                Some(&signer),
                &operator().address,
                "100.5",
                "0",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AllowanceError::InvalidInput(_)));
        assert!(ledger.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_operator_redeems_payment() {
        let (ledger, ops) = operations();
        let record =
            AllowanceRecord::new(test_wallet().address, operator().address, Amount::from_units(10000))
                .unwrap();
        let auth = sign_allowance(&record, Some(&payer_signer())).unwrap();

        let result = ops
            .send_payment_with_allowance(&operator(), &auth, "500")
            .await
            .unwrap();
        assert!(result.is_success());

        let tx = ledger.last_submitted().unwrap();
        assert_eq!(tx.account, operator().address);
        assert!(tx.amount.is_none());

        match decode_first_memo(&tx) {
            HookMemo::AllowancePayment {
                user_address,
                payment_amount,
                allowance,
            } => {
                assert_eq!(user_address, test_wallet().address);
                assert_eq!(payment_amount, Amount::from_units(500));
                assert_eq!(allowance.amount, Amount::from_units(10000));
                assert_eq!(allowance.signature, auth.signature);
            }
            other => panic!("unexpected memo {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_redeem_requires_matching_payee() {
        let (ledger, ops) = operations();
        let record = AllowanceRecord::new(
            test_wallet().address,
            AccountAddress::new("rSomeoneElse"),
            Amount::from_units(10000),
        )
        .unwrap();
        let auth = sign_allowance(&record, Some(&payer_signer())).unwrap();

        let err = ops
            .send_payment_with_allowance(&operator(), &auth, "500")
            .await
            .unwrap_err();
        assert!(matches!(err, AllowanceError::InvalidInput(_)));
        assert!(ledger.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_over_cap_payment_is_left_to_the_hook() {
        let (ledger, ops) = operations();
        let record =
            AllowanceRecord::new(test_wallet().address, operator().address, Amount::from_units(100))
                .unwrap();
        let auth = sign_allowance(&record, Some(&payer_signer())).unwrap();

        ops.send_payment_with_allowance(&operator(), &auth, "250")
            .await
            .unwrap();
        assert_eq!(ledger.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_withdraw() {
        let (ledger, ops) = operations();
        ops.withdraw_balance(&test_wallet(), "1500").await.unwrap();

        let tx = ledger.last_submitted().unwrap();
        assert_eq!(tx.account, test_wallet().address);
        assert_eq!(
            decode_first_memo(&tx),
            HookMemo::Withdraw {
                amount: Amount::from_units(1500)
            }
        );
    }

    #[tokio::test]
    async fn test_missing_hook_address() {
        let ledger = MockLedgerClient::new();
        let ops = AllowanceOperations::new(ledger.clone(), NetworkConfig::default());

        let err = ops.withdraw_balance(&test_wallet(), "1").await.unwrap_err();
        assert!(matches!(err, AllowanceError::InvalidInput(ref m) if m.contains("hook")));
        assert!(ledger.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_ledger_errors_are_wrapped() {
        let (ledger, ops) = operations();
        ledger.fail_with(HookpayError::ConnectionFailed {
            target: "http://localhost:5005".into(),
            reason: "refused".into(),
        });

        let err = ops.withdraw_balance(&test_wallet(), "1").await.unwrap_err();
        assert!(matches!(err, AllowanceError::Ledger(HookpayError::ConnectionFailed { .. })));
        assert!(err.is_retryable());
    }
}
