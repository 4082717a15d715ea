use proptest::prelude::*;
use xtxt_demux::{demux_bytes, demux_source, DemuxConfig, Demuxed, StreamStore, ESCAPE};
use xtxt_source::SliceSource;

/// One literal run or one marker code.
#[derive(Debug, Clone)]
enum Piece {
    Text(Vec<u8>),
    Marker(u8),
}

fn piece() -> impl Strategy<Value = Piece> {
    prop_oneof![
        3 => prop::collection::vec(0u8..ESCAPE, 1..12).prop_map(Piece::Text),
        1 => prop_oneof![Just(0xFEu8), Just(0xFD), Just(0xFC)].prop_map(Piece::Marker),
    ]
}

/// Well-formed containers with fewer stream markers than the default cap.
fn container() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(piece(), 0..48).prop_map(|pieces| {
        let mut out = Vec::new();
        for piece in pieces {
            match piece {
                Piece::Text(bytes) => out.extend_from_slice(&bytes),
                Piece::Marker(code) => out.extend_from_slice(&[ESCAPE, code]),
            }
        }
        out
    })
}

fn split_plan() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..17, 1..6)
}

fn demux_with_plan(input: &[u8], plan: Vec<usize>) -> Demuxed {
    let source = SliceSource::with_plan(input, plan).unwrap();
    demux_source(source, DemuxConfig::default()).unwrap()
}

fn joined(store: &StreamStore) -> Vec<Vec<u8>> {
    store
        .streams()
        .iter()
        .map(|stream| {
            stream
                .lines()
                .iter()
                .flat_map(|line| line.as_bytes().to_vec())
                .collect()
        })
        .collect()
}

proptest! {
    #[test]
    fn every_byte_lands_in_a_line_or_a_marker(input in container(), plan in split_plan()) {
        let out = demux_with_plan(&input, plan);

        prop_assert_eq!(out.stats.bytes, input.len() as u64);
        prop_assert_eq!(out.stats.literal_bytes, out.streams.byte_len() as u64);
        prop_assert_eq!(
            out.streams.byte_len() as u64 + 2 * out.stats.markers(),
            input.len() as u64
        );
        prop_assert_eq!(out.stats.dropped_bytes, 0);
    }

    #[test]
    fn split_plan_does_not_change_stream_bytes(input in container(), plan in split_plan()) {
        let whole = demux_bytes(&input, DemuxConfig::default()).unwrap();
        let split = demux_with_plan(&input, plan);

        prop_assert_eq!(split.streams.stream_count(), whole.streams.stream_count());
        prop_assert_eq!(split.frames, whole.frames);
        prop_assert_eq!(joined(&split.streams), joined(&whole.streams));
    }

    #[test]
    fn marker_straddling_two_buffers_decodes_like_one(
        input in container().prop_filter("needs a marker", |bytes| bytes.contains(&ESCAPE)),
        pick in any::<prop::sample::Index>(),
    ) {
        let escapes: Vec<usize> = input
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b == ESCAPE)
            .map(|(i, _)| i)
            .collect();
        let at = escapes[pick.index(escapes.len())];

        let whole = demux_bytes(&input, DemuxConfig::default()).unwrap();
        let split = demux_with_plan(&input, vec![at + 1, input.len() - at - 1]);

        prop_assert_eq!(split.streams, whole.streams);
        prop_assert_eq!(split.frames, whole.frames);
        prop_assert_eq!(split.stats.markers(), whole.stats.markers());
    }
}
