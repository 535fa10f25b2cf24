//! Application-wide constants and compile-time configuration.
//!
//! Timing parameters, thresholds, GATT names and protocol constants for
//! every demo live here so they can be tuned in one place. Thresholds that
//! were tuned by hand on the bench are also exposed as runtime parameters
//! (`analog::DebounceConfig`, `apps::movement::MovementConfig`).

use core::net::Ipv6Addr;

// Event queue

/// Slots in the application event queue.
pub const EVENT_QUEUE_DEPTH: usize = 20;

/// Longest a task-context producer may wait for a free slot (ms).
pub const EVENT_POST_TIMEOUT_MS: u32 = 1;

// Buttons

/// Digital button sampling period (ms).
pub const BUTTON_POLL_MS: u32 = 10;

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u32 = 50;

/// Hold time before a release restarts BLE advertising (s).
pub const HOLD_RESTART_ADV_SECS: u8 = 2;

/// Hold time before a release factory-resets the Thread credentials (s).
pub const HOLD_FACTORY_RESET_SECS: u8 = 5;

/// Upper bound of the LED receiver's "restart advertising" hold window (s).
pub const HOLD_RESTART_ADV_MAX_SECS: u8 = 10;

// Analog doorbell (GPADC on ANIO0)

/// Voltage above which a sample counts towards a press (mV).
pub const ADC_PRESS_MV: u32 = 1500;

/// Voltage below which a sample counts towards a release (mV).
pub const ADC_RELEASE_MV: u32 = 500;

/// Consecutive confirming samples before a transition is reported.
pub const ADC_DEBOUNCE_COUNT: u8 = 3;

/// ADC polling period (ms).
pub const ADC_POLL_MS: u32 = 100;

/// ADC resolution and full-scale voltage.
pub const ADC_RESOLUTION_BITS: u8 = 11;
pub const ADC_FULL_SCALE_MV: u32 = 3600;

// LED patterns (on ms, off ms)

pub const HEARTBEAT_BLINK: (u16, u16) = (100, 1900);
pub const DOORBELL_RING_BLINK: (u16, u16) = (150, 150);
pub const BLE_RING_BLINK: (u16, u16) = (100, 100);
pub const ADV_BLINK: (u16, u16) = (500, 500);
pub const LEDRX_ADV_BLINK: (u16, u16) = (250, 250);
pub const THREAD_JOIN_BLINK: (u16, u16) = (200, 200);

// Standalone doorbell

/// Reminder period while ringing (ms).
pub const RING_TICK_MS: u32 = 2_000;

/// Ringing stops on its own after this long (ms).
pub const AUTO_DISMISS_MS: u32 = 30_000;

// BLE

/// Advertised names.
pub const BLE_DOORBELL_NAME: &str = "QPG Doorbell";
pub const THREAD_DOORBELL_NAME: &str = "QPG Thread Doorbell";
pub const LEDRX_NAME: &str = "LedRX";

/// Name the central scans for (substring match).
pub const LEDTX_TARGET_NAME: &str = "qBLE peripheral";

/// Advertising interval range (0.625 ms units) and broadcast duration (ms).
pub const BLE_ADV_INTERVAL_MIN: u16 = 0x0020;
pub const BLE_ADV_INTERVAL_MAX: u16 = 0x0060;
pub const BLE_ADV_DURATION_MS: u16 = 0xF000;

/// Delay before the central starts its first scan (ms).
pub const LEDTX_STARTUP_SCAN_DELAY_MS: u32 = 2_000;

/// Delay before the central rescans after a disconnect (ms).
pub const LEDTX_RESCAN_DELAY_MS: u32 = 1_000;

/// Period of the remote LED toggle once the link is ready (ms).
pub const LEDTX_TOGGLE_MS: u32 = 2_000;

// Thread

/// UDP port used for doorbell ring multicasts.
pub const RING_UDP_PORT: u16 = 5683;

/// Realm-local all-nodes multicast (ff03::1).
pub const RING_MULTICAST_ADDR: Ipv6Addr = Ipv6Addr::new(0xff03, 0, 0, 0, 0, 0, 0, 1);

/// Default commissioning parameters, used until a phone writes new ones.
pub const THREAD_DEFAULT_NETWORK_NAME: &str = "DoorbellNet";
pub const THREAD_DEFAULT_CHANNEL: u8 = 15;
pub const THREAD_DEFAULT_PAN_ID: u16 = 0xABCD;

/// Valid 2.4 GHz IEEE 802.15.4 channels.
pub const THREAD_CHANNEL_MIN: u8 = 11;
pub const THREAD_CHANNEL_MAX: u8 = 26;

// UART link

pub const UART_BAUD_RATE: u32 = 115_200;

/// Receive line buffer; one byte is kept free, so lines hold at most 127.
pub const UART_RX_BUFFER_SIZE: usize = 128;

/// Receiver poll period when no byte is pending (ms).
pub const UART_RX_POLL_MS: u32 = 10;

/// Sender message period (ms).
pub const UART_TX_PERIOD_MS: u32 = 1_000;

/// Payload carried by every sender message.
pub const UART_TX_PAYLOAD: &str = "HELLO_FROM_BOARD1";

// Ultrasonic movement detector (HC-SR04 on GPIO10/GPIO11)

pub const SENSOR_TRIGGER_PULSE_US: u32 = 10;
pub const SENSOR_INTERVAL_MS: u32 = 1_000;

/// Longest wait for the echo line to rise after triggering (us).
pub const SENSOR_ECHO_START_TIMEOUT_US: u32 = 10_000;

/// Longest echo pulse accepted; ~400 cm round trip is well inside (us).
pub const SENSOR_ECHO_END_TIMEOUT_US: u32 = 30_000;

pub const SENSOR_MIN_DISTANCE_CM: u32 = 2;
pub const SENSOR_MAX_DISTANCE_CM: u32 = 400;

/// Distance change that counts as movement (cm, exclusive).
pub const SENSOR_MOVEMENT_DELTA_CM: u32 = 2;

// LED blink demo

pub const BLINK_TOGGLE_MS: u32 = 500;
pub const BLINK_HELLO_MS: u32 = 1_000;
