use crate::Fault;

/// Receiver for unrecoverable peripheral faults.
///
/// The driver calls [`report_fatal_fault`](FaultHandler::report_fatal_fault) exactly once per
/// failed operation, right before returning the matching [`Error`](crate::Error).  A handler
/// may halt or reset the system instead of returning; if it does return, the caller sees the
/// `Err` and must treat the device state as unknown.
pub trait FaultHandler {
    fn report_fatal_fault(&mut self, fault: Fault);
}

/// Do nothing, leave it to the caller to act on the returned error.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreFaults;

impl FaultHandler for IgnoreFaults {
    fn report_fatal_fault(&mut self, _fault: Fault) {}
}

/// Panic on the first fault, so control never returns to the code that used the device.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicOnFault;

impl FaultHandler for PanicOnFault {
    fn report_fatal_fault(&mut self, fault: Fault) {
        panic!(
            "MCP23008 fault {:#06x}: {:?} on {:?}",
            Fault::CODE,
            fault.kind,
            fault.register
        );
    }
}

impl<F: FnMut(Fault)> FaultHandler for F {
    fn report_fatal_fault(&mut self, fault: Fault) {
        self(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FaultKind, Register};

    const FAULT: Fault = Fault {
        kind: FaultKind::SequentialMode,
        register: Some(Register::GPIO),
    };

    #[test]
    fn closure_handler() {
        let mut seen = std::vec::Vec::new();
        let mut handler = |f: Fault| seen.push(f);
        handler.report_fatal_fault(FAULT);
        assert_eq!(seen, [FAULT]);
    }

    #[test]
    #[should_panic(expected = "MCP23008 fault 0x2308")]
    fn panic_handler() {
        PanicOnFault.report_fatal_fault(FAULT);
    }
}
