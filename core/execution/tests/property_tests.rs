// Property tests for gas accounting and message validation

mod common;

use common::*;
use proptest::prelude::*;
use redt_execution::params::{
    TX_DATA_NON_ZERO_GAS_EIP2028, TX_DATA_NON_ZERO_GAS_FRONTIER, TX_DATA_ZERO_GAS, TX_GAS,
    TX_GAS_CONTRACT_CREATION,
};
use redt_execution::*;
use redt_private::MemoryTransactionManager;

const CASES: u32 = 64;

fn sender() -> Address {
    create_test_address(1)
}

fn transfer(nonce: u64, gas: u64, price: u64) -> Message {
    Message::Public(
        MessagePayload::new(sender(), Some(create_test_address(2)), nonce)
            .with_gas(gas, U256::from(price)),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(CASES))]

    #[test]
    fn intrinsic_gas_matches_byte_counts(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        creation in any::<bool>(),
        homestead in any::<bool>(),
        eip2028 in any::<bool>(),
    ) {
        let zero = data.iter().filter(|&&b| b == 0).count() as u64;
        let non_zero = data.len() as u64 - zero;
        let base = if creation && homestead { TX_GAS_CONTRACT_CREATION } else { TX_GAS };
        let per_byte = if eip2028 { TX_DATA_NON_ZERO_GAS_EIP2028 } else { TX_DATA_NON_ZERO_GAS_FRONTIER };

        let gas = intrinsic_gas(&data, creation, homestead, eip2028).unwrap();
        prop_assert_eq!(gas, base + non_zero * per_byte + zero * TX_DATA_ZERO_GAS);

        let call = intrinsic_gas(&data, false, homestead, eip2028).unwrap();
        prop_assert!(gas >= call);
    }

    #[test]
    fn gas_used_is_bought_minus_returned(
        gas in 21_000u64..500_000,
        execution in 0u64..500_000,
        refund in 0u64..200_000,
        price in 1u64..50,
    ) {
        let mut evm = TestEvm::new(ChainConfig::default());
        evm.fund(sender(), 1_000_000_000);
        evm.execution_gas = execution;
        evm.refund = refund;
        let mut pool = GasPool::new(10_000_000);
        let ptm = MemoryTransactionManager::new();

        let msg = transfer(0, gas, price);
        let mut st = StateTransition::new(&mut evm, &msg, &mut pool, &ptm);
        let result = st.transition_db().unwrap();
        prop_assert_eq!(st.gas_used(), st.initial_gas() - st.gas());
        prop_assert_eq!(result.used_gas, st.gas_used());
        drop(st);

        // Usage before refunds, then the refund is bounded by half of it
        let consumed = TX_GAS + execution.min(gas - TX_GAS);
        let credited = (consumed / 2).min(refund);
        prop_assert_eq!(result.used_gas, consumed - credited);
        prop_assert!(result.used_gas >= consumed - consumed / 2);

        let fee = U256::from(result.used_gas) * U256::from(price);
        prop_assert_eq!(evm.public.balance(&COINBASE), fee);
        prop_assert_eq!(evm.public.balance(&sender()), U256::from(1_000_000_000u64) - fee);
        prop_assert_eq!(pool.gas(), 10_000_000 - result.used_gas);
    }

    #[test]
    fn nonce_mismatch_is_classified(state in 0u64..1_000, message in 0u64..1_000) {
        let mut evm = TestEvm::new(ChainConfig::default());
        evm.fund(sender(), 1_000_000);
        evm.public.set_nonce(&sender(), state);
        let mut pool = GasPool::new(10_000_000);
        let ptm = MemoryTransactionManager::new();

        let result = apply_message(&mut evm, &transfer(message, 21_000, 1), &mut pool, &ptm);
        if state < message {
            prop_assert_eq!(result, Err(TransitionError::NonceTooHigh { state, message }));
        } else if state > message {
            prop_assert_eq!(result, Err(TransitionError::NonceTooLow { state, message }));
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(evm.public.nonce(&sender()), state + 1);
        }
    }

    #[test]
    fn block_gas_never_exceeds_pool(
        limits in proptest::collection::vec(21_000u64..120_000, 1..20),
        block_gas in 21_000u64..600_000,
    ) {
        let mut evm = TestEvm::new(ChainConfig::default());
        evm.fund(sender(), u64::MAX);
        let mut pool = GasPool::new(block_gas);
        let ptm = MemoryTransactionManager::new();

        let mut nonce = 0;
        let mut total_used = 0;
        for limit in limits {
            let available = pool.gas();
            match apply_message(&mut evm, &transfer(nonce, limit, 1), &mut pool, &ptm) {
                Ok(result) => {
                    prop_assert!(limit <= available);
                    total_used += result.used_gas;
                    nonce += 1;
                }
                Err(e) => {
                    prop_assert_eq!(
                        e,
                        TransitionError::GasLimitReached { requested: limit, available }
                    );
                    prop_assert_eq!(pool.gas(), available);
                }
            }
            prop_assert_eq!(pool.gas(), block_gas - total_used);
        }
        prop_assert!(total_used <= block_gas);
    }
}
