//! Unit tests for Fault and FaultKind

use core_types::{fatal, Fault, FaultKind};

#[cfg(test)]
mod fault_kind_tests {
    use super::*;

    #[test]
    fn test_protocol_faults() {
        let faults = [
            Fault::ZeroSizedAllocation,
            Fault::InvalidConfig("space too small".to_string()),
            Fault::RootStackOverflow { capacity: 64 },
            Fault::RootStackUnderflow,
            Fault::RootOrder {
                expected: 3,
                actual: 1,
            },
            Fault::UnknownArrayRoot(7),
            Fault::UnknownRegisterSet(2),
            Fault::UnsupportedLocation(0x2),
            Fault::UnsupportedPointees(0x2),
            Fault::NullDereference,
            Fault::OverlappingBorrow { offset: 12 },
        ];
        for fault in faults {
            assert_eq!(fault.kind(), FaultKind::Protocol, "{fault}");
        }
    }

    #[test]
    fn test_exhaustion_faults() {
        assert_eq!(
            Fault::NeverFits {
                requested: 100,
                capacity: 64
            }
            .kind(),
            FaultKind::Exhaustion
        );
        assert_eq!(
            Fault::HeapExhausted { requested: 9 }.kind(),
            FaultKind::Exhaustion
        );
    }

    #[test]
    fn test_arithmetic_faults() {
        assert_eq!(Fault::DivisionByZero.kind(), FaultKind::Arithmetic);
        assert_eq!(
            Fault::NaturalUnderflow {
                operation: "decrement"
            }
            .kind(),
            FaultKind::Arithmetic
        );
    }

    #[test]
    fn test_corruption_faults() {
        let faults = [
            Fault::GuardMismatch {
                offset: 0,
                header: 0,
                footer: 0,
                word_count: 0,
            },
            Fault::DanglingReference { offset: 40 },
            Fault::ToSpaceOverflow {
                requested: 10,
                available: 2,
            },
            Fault::Malformed {
                what: "sign",
                value: 5,
            },
        ];
        for fault in faults {
            assert_eq!(fault.kind(), FaultKind::Corruption, "{fault}");
        }
    }

    #[test]
    fn test_fault_kind_display() {
        assert_eq!(FaultKind::Protocol.to_string(), "protocol");
        assert_eq!(FaultKind::Exhaustion.to_string(), "exhaustion");
        assert_eq!(FaultKind::Arithmetic.to_string(), "arithmetic");
        assert_eq!(FaultKind::Corruption.to_string(), "corruption");
    }
}

#[cfg(test)]
mod fault_message_tests {
    use super::*;

    #[test]
    fn test_guard_mismatch_dumps_words() {
        let fault = Fault::GuardMismatch {
            offset: 16,
            header: 0xdead_beef,
            footer: 0x0000_0001,
            word_count: 5,
        };
        let message = fault.to_string();
        assert!(message.contains("word 16"));
        assert!(message.contains("0xdeadbeef"));
        assert!(message.contains("0x00000001"));
        assert!(message.contains("word count 5"));
    }

    #[test]
    fn test_never_fits_names_both_sizes() {
        let message = Fault::NeverFits {
            requested: 4096,
            capacity: 1024,
        }
        .to_string();
        assert!(message.contains("4096"));
        assert!(message.contains("1024"));
    }

    #[test]
    fn test_root_order_names_depths() {
        let message = Fault::RootOrder {
            expected: 4,
            actual: 2,
        }
        .to_string();
        assert!(message.contains("expected depth 4"));
        assert!(message.contains("got depth 2"));
    }

    #[test]
    #[should_panic(expected = "fatal exhaustion fault: heap exhausted: 77 words")]
    fn test_fatal_exhaustion() {
        fatal(Fault::HeapExhausted { requested: 77 });
    }

    #[test]
    #[should_panic(expected = "fatal protocol fault: root stack underflow")]
    fn test_fatal_protocol() {
        fatal(Fault::RootStackUnderflow);
    }
}
