/// Size of the broken report descriptor shipped by the 0575 gamepad
pub const RDESC_ORIG_SIZE: usize = 137;

/// Corrected report descriptor for the 0575 gamepad
///
/// Buttons follow the gamepad layout:
///
/// Button 01: BTN_SOUTH (CROSS)
/// Button 02: BTN_EAST (CIRCLE)
/// Button 03: BTN_NORTH (TRIANGLE)
/// Button 04: BTN_WEST (SQUARE)
/// Button 05: BTN_TL (L1)
/// Button 06: BTN_TR (R1)
/// Button 07: BTN_TL2 (L2)
/// Button 08: BTN_TR2 (R2)
/// Button 09: BTN_SELECT
/// Button 10: BTN_START
/// Button 11: BTN_MODE
/// Button 12: BTN_THUMBL (LS1)
/// Button 13: BTN_THUMBR (LS2)
/// LS1: X/Y axis
/// LS2: Rx/Ry axis
/// L2/R2 touch sensors: Z/Rz axis
pub const RDESC_FIXED: [u8; 141] = [
    0x05, 0x01, // Usage Page (Generic Desktop)        0
    0x09, 0x05, // Usage (Game Pad)                    2
    0xa1, 0x01, // Collection (Application)            4
    0x15, 0x00, //  Logical Minimum (0)                6
    0x25, 0x01, //  Logical Maximum (1)                8
    0x35, 0x00, //  Physical Minimum (0)               10
    0x45, 0x01, //  Physical Maximum (1)               12
    0x75, 0x01, //  Report Size (1)                    14
    0x95, 0x0d, //  Report Count (13)                  16
    0x05, 0x09, //  Usage Page (Button)                18
    0x09, 0x03, //  Usage (BTN_NORTH)                  20
    0x09, 0x02, //  Usage (BTN_EAST)                   22
    0x09, 0x01, //  Usage (BTN_SOUTH)                  24
    0x09, 0x04, //  Usage (BTN_WEST)                   26
    0x09, 0x05, //  Usage (BTN_TL)                     28
    0x09, 0x06, //  Usage (BTN_TR)                     30
    0x09, 0x07, //  Usage (BTN_TL2)                    32
    0x09, 0x08, //  Usage (BTN_TR2)                    34
    0x09, 0x09, //  Usage (BTN_SELECT)                 36
    0x09, 0x10, //  Usage (BTN_START)                  38
    0x09, 0x12, //  Usage (BTN_THUMBL)                 40
    0x09, 0x13, //  Usage (BTN_THUMBR)                 42
    0x09, 0x11, //  Usage (BTN_MODE)                   44
    0x81, 0x02, //  Input (Data,Var,Abs)               46
    0x75, 0x01, //  Report Size (1)                    48
    0x95, 0x03, //  Report Count (3)                   50
    0x81, 0x01, //  Input (Cnst,Arr,Abs)               52
    0x05, 0x01, //  Usage Page (Generic Desktop)       54
    0x25, 0x07, //  Logical Maximum (7)                56
    0x46, 0x3b, 0x01, //  Physical Maximum (315)       58
    0x75, 0x04, //  Report Size (4)                    61
    0x95, 0x01, //  Report Count (1)                   63
    0x65, 0x14, //  Unit (EnglishRotation: deg)        65
    0x09, 0x39, //  Usage (Hat switch)                 67
    0x81, 0x42, //  Input (Data,Var,Abs,Null)          69
    0x65, 0x00, //  Unit (None)                        71
    0x95, 0x01, //  Report Count (1)                   73
    0x81, 0x01, //  Input (Cnst,Arr,Abs)               75
    0x26, 0xff, 0x00, //  Logical Maximum (255)        77
    0x46, 0xff, 0x00, //  Physical Maximum (255)       80
    0x09, 0x30, //  Usage (X)                          83
    0x09, 0x31, //  Usage (Y)                          85
    0x09, 0x33, //  Usage (Rx)                         87
    0x09, 0x34, //  Usage (Ry)                         89
    0x75, 0x08, //  Report Size (8)                    91
    0x95, 0x04, //  Report Count (4)                   93
    0x81, 0x02, //  Input (Data,Var,Abs)               95
    0x95, 0x0a, //  Report Count (10)                  97
    0x81, 0x01, //  Input (Cnst,Arr,Abs)               99
    0x05, 0x01, //  Usage Page (Generic Desktop)       101
    0x26, 0xff, 0x00, //  Logical Maximum (255)        103
    0x46, 0xff, 0x00, //  Physical Maximum (255)       106
    0x09, 0x32, //  Usage (Z)                          109
    0x09, 0x35, //  Usage (Rz)                         111
    0x95, 0x02, //  Report Count (2)                   113
    0x81, 0x02, //  Input (Data,Var,Abs)               115
    0x95, 0x08, //  Report Count (8)                   117
    0x81, 0x01, //  Input (Cnst,Arr,Abs)               119
    0x06, 0x00, 0xff, //  Usage Page (Vendor Defined)  121
    0xb1, 0x02, //  Feature (Data,Var,Abs)             124
    0x0a, 0x21, 0x26, //  Usage (Vendor Usage 0x2621)  126
    0x95, 0x08, //  Report Count (8)                   129
    0x91, 0x02, //  Output (Data,Var,Abs)              131
    0x0a, 0x21, 0x26, //  Usage (Vendor Usage 0x2621)  133
    0x95, 0x08, //  Report Count (8)                   136
    0x81, 0x02, //  Input (Data,Var,Abs)               138
    0xc0, // End Collection                            140
];

/// Replace the report descriptor of the gamepad if it is the known broken
/// one. The descriptor is only recognized by its size; any other descriptor
/// is returned unchanged.
pub fn report_fixup(rdesc: &[u8]) -> &[u8] {
    if rdesc.len() == RDESC_ORIG_SIZE {
        return &RDESC_FIXED;
    }
    rdesc
}
