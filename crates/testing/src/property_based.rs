//! Property-based coverage for `Status` and `IdAllocator`, gated behind an
//! opt-in `property-based-tests` feature rather than part of the default
//! feature set.

#[cfg(test)]
mod tests {
    use ignition_core::{IdAllocator, Status};
    use quickcheck::quickcheck;

    quickcheck! {
        fn status_error_code_round_trips(code: i32, message: String) -> bool {
            if code == 0 {
                return Status::new(code, message).is_ok();
            }
            let status = Status::new(code, message.clone());
            status.code() == code && status.message() == message
        }
    }

    proptest::proptest! {
        #[test]
        fn id_allocator_never_issues_an_id_past_configured_max(ops in proptest::collection::vec(0u8..2, 1..200)) {
            struct PropTag;
            IdAllocator::<u32, PropTag>::configure_max(50);
            let mut issued = Vec::new();
            for op in ops {
                if op == 0 || issued.is_empty() {
                    let id = IdAllocator::<u32, PropTag>::next();
                    proptest::prop_assert!(id <= 50);
                    issued.push(id);
                } else {
                    let id = issued.pop().unwrap();
                    IdAllocator::<u32, PropTag>::free(id);
                }
            }
        }
    }
}
