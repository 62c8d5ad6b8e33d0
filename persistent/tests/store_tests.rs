//! Sibling setting blocks sharing one flash device

mod common;

use common::{CountingIrq, MemFlash};
use picogpio_persistent::{
    Block, CommMode, DebugFlagsRecord, GpioSettingsRecord, RecordStore, TcpPortRecord, UartBaudRecord,
};

fn store() -> RecordStore<MemFlash, CountingIrq> {
    RecordStore::new(MemFlash::new(16), CountingIrq::default())
}

#[test]
fn test_fresh_device_falls_back_to_defaults() {
    let store = store();
    assert_eq!(store.load::<TcpPortRecord>().unwrap_or_default(), TcpPortRecord { port: 5050 });
    assert_eq!(store.load::<UartBaudRecord>().unwrap_or_default(), UartBaudRecord { baud: 115_200 });
    assert_eq!(store.load::<DebugFlagsRecord>().unwrap_or_default().flags, u32::MAX);
    assert_eq!(store.load::<GpioSettingsRecord>().unwrap_or_default(), GpioSettingsRecord::default());
}

#[test]
fn test_blocks_are_independent() {
    let mut store = store();
    let gpio = GpioSettingsRecord { device_id: 7, comm_mode: CommMode::Json, auto_response: false };

    store.save(&TcpPortRecord { port: 6000 }).unwrap();
    store.save(&UartBaudRecord { baud: 57_600 }).unwrap();
    store.save(&DebugFlagsRecord { flags: 0x0000_00F0 }).unwrap();
    store.save(&gpio).unwrap();

    store.erase(Block::UartBaud).unwrap();

    assert_eq!(store.load::<TcpPortRecord>(), Some(TcpPortRecord { port: 6000 }));
    assert!(store.load::<UartBaudRecord>().is_none());
    assert_eq!(store.load::<DebugFlagsRecord>(), Some(DebugFlagsRecord { flags: 0xF0 }));
    assert_eq!(store.load::<GpioSettingsRecord>(), Some(gpio));
}

#[test]
fn test_rewrite_erases_before_program() {
    let mut store = store();
    store.save(&TcpPortRecord { port: 0x00FF }).unwrap();
    // Without an erase the NOR model would AND the two values together
    store.save(&TcpPortRecord { port: 0xFF00 }).unwrap();
    assert_eq!(store.load::<TcpPortRecord>(), Some(TcpPortRecord { port: 0xFF00 }));

    let (flash, irq) = store.into_inner();
    assert_eq!(flash.erases, 2);
    assert_eq!(irq.windows, 2);
    assert!(!irq.masked);
}

#[test]
fn test_page_tail_stays_erased() {
    let mut store = store();
    store.save(&UartBaudRecord { baud: 9_600 }).unwrap();
    let region = store.layout().region(Block::UartBaud).unwrap();
    let flash = store.flash();
    let tail = &flash.data[region.offset as usize + 14..region.offset as usize + 256];
    assert!(tail.iter().all(|&b| b == 0xFF));
}
