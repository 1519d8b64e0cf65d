#[path = "../common/mod.rs"]
mod common;

use libril::adapter::{self, create_adapter_for};
use libril::protocol::responses::CardStatusLayout;
use libril::protocol::{codec, Frame, ParcelReader, RawFrame};
use libril::{RequestKind, Vendor};
use proptest::prelude::*;

// Whatever arrives off the socket, decoding returns an error instead of
// panicking or allocating past the buffer.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn inbound_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256),
                                   kind in prop::sample::select(vec![1, 11, 14, 20, 28, 38, 42, 51, 59])) {
        let adapters = [
            create_adapter_for(Vendor::Generic),
            create_adapter_for(Vendor::Qualcomm),
            create_adapter_for(Vendor::Samsung),
        ];
        for a in &adapters {
            match codec::decode_inbound(&bytes) {
                Ok(RawFrame::Solicited { mut body, .. }) => {
                    let _ = adapter::decode_solicited(a.as_ref(), RequestKind::from_code(kind), &mut body);
                }
                Ok(RawFrame::Unsolicited { mut body }) => {
                    let _ = adapter::decode_unsolicited(a.as_ref(), &mut body);
                }
                Err(_) => {}
            }
        }
    }

    #[test]
    fn parcel_reads_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut r = ParcelReader::new(&bytes);
        let _ = r.read_string();
        let mut r = ParcelReader::new(&bytes);
        let _ = r.read_string_array();
        let mut r = ParcelReader::new(&bytes);
        let _ = r.read_int_array();
        let mut r = ParcelReader::new(&bytes);
        let _ = r.read_byte_array();
        let mut r = ParcelReader::new(&bytes);
        let _ = libril::protocol::decode_card_status(&mut r, CardStatusLayout::WITH_RETRY_COUNTS);
    }

    #[test]
    fn frame_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = Frame::decode(&bytes);
        let _ = Frame::read_from(&mut bytes.as_slice(), 32);
    }
}
