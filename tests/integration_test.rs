use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use bitcrc::crc::{Convention, CrcEngine, CrcParams, CrcPreset};
use bitcrc::stream::{
    BitPack, BitStream, ByteSink, ByteSource, Checksummed, FixedBitPack, IoSink, IoSource,
    SliceSource,
};
use pretty_assertions::assert_eq;
use std::fs::File;
use std::sync::Arc;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_encode(data: &[u8]) -> String {
    let symbols = (data.len() * 8).div_ceil(6);
    let mut reader = BitStream::new(SliceSource::new(data));
    (0..symbols)
        .map(|_| BASE64_ALPHABET[reader.read_bits(6) as usize] as char)
        .collect()
}

fn base64_decode(text: &str) -> Vec<u8> {
    let mut writer = BitStream::new(Vec::new());
    for c in text.bytes() {
        let index = BASE64_ALPHABET.iter().position(|&a| a == c).unwrap();
        writer.write(FixedBitPack::<6>::new(index as u64));
    }
    // trailing bits of an unpadded encoding are padding, never data
    let mut bytes = writer.into_inner();
    bytes.truncate(text.len() * 6 / 8);
    bytes
}

#[test]
fn test_base64_symbol_packing() {
    let inputs: [&[u8]; 6] = [b"", b"f", b"fo", b"foo", b"foobar", &[0x00, 0xFF, 0x10, 0x83, 0xFE]];
    for input in inputs {
        let encoded = base64_encode(input);
        assert_eq!(encoded, STANDARD_NO_PAD.encode(input));
        assert_eq!(base64_decode(&encoded), input.to_vec());
    }

    let long: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    assert_eq!(base64_encode(&long), STANDARD_NO_PAD.encode(&long));
}

fn primes_below(limit: usize) -> Vec<u64> {
    let mut composite = vec![false; limit];
    let mut primes = Vec::new();
    for n in 2..limit {
        if !composite[n] {
            primes.push(n as u64);
            let mut m = n * n;
            while m < limit {
                composite[m] = true;
                m += n;
            }
        }
    }
    primes
}

/// Tiered gap code: `0` + 4 bits, `10` + 8 bits, `11` + 16 bits.
fn write_gap<C: ByteSink>(stream: &mut BitStream<C>, gap: u64) {
    if gap < 16 {
        stream.write_bits(1, 0b0);
        stream.write_bits(4, gap);
    } else if gap < 256 {
        stream.write_bits(2, 0b10);
        stream.write_bits(8, gap);
    } else {
        stream.write_bits(2, 0b11);
        stream.write_bits(16, gap);
    }
}

fn read_gap<C: ByteSource>(stream: &mut BitStream<C>) -> u64 {
    if stream.read_bits(1) == 0 {
        stream.read_bits(4)
    } else if stream.read_bits(1) == 0 {
        stream.read_bits(8)
    } else {
        stream.read_bits(16)
    }
}

fn encode_primes(primes: &[u64]) -> Vec<u8> {
    let mut stream = BitStream::new(Checksummed::new(Vec::new(), CrcPreset::Crc32Iso.engine()));
    stream.write_bits(32, primes.len() as u64);
    let mut previous = 0;
    for &p in primes {
        write_gap(&mut stream, p - previous);
        previous = p;
    }
    stream.write_flush();
    let crc = stream.get_ref().checksum();
    stream.write_bits(32, crc);
    stream.write_flush();
    stream.into_inner().into_parts().0
}

fn decode_primes(bytes: &[u8]) -> Option<Vec<u64>> {
    let source = SliceSource::new(bytes);
    let mut stream = BitStream::new(Checksummed::new(source, CrcPreset::Crc32Iso.engine()));
    let count = stream.read_bits(32);
    let mut primes = Vec::with_capacity(count as usize);
    let mut previous = 0;
    for _ in 0..count {
        if !stream.can_read(1) {
            return None;
        }
        previous += read_gap(&mut stream);
        primes.push(previous);
    }
    stream.read_align();
    let computed = stream.get_ref().checksum();
    let stored = stream.read_bits(32);
    (computed == stored).then_some(primes)
}

#[test]
fn test_prime_gap_stream_with_trailing_crc() {
    let primes = primes_below(5000);
    let bytes = encode_primes(&primes);
    assert!(bytes.len() < primes.len() * 2);
    assert_eq!(decode_primes(&bytes), Some(primes.clone()));

    let mut corrupted = bytes.clone();
    corrupted[10] ^= 0x04;
    assert_ne!(decode_primes(&corrupted), Some(primes.clone()));

    let truncated = &bytes[..bytes.len() / 2];
    assert_eq!(decode_primes(truncated), None);
}

#[test]
fn test_interleaved_crc_matches_standalone() {
    // A consumer folding the same bytes itself gets the same checksum as the
    // channel adapter.
    let mut stream = BitStream::new(Checksummed::new(Vec::new(), CrcPreset::Crc16X25.engine()));
    for width in 1..=24u32 {
        stream.write(BitPack::new(width, 0xA5A5A5 >> (24 - width)));
    }
    stream.write_flush();
    let (bytes, crc) = stream.into_inner().into_parts();

    let mut standalone = CrcPreset::Crc16X25.engine();
    standalone.update(&bytes);
    assert_eq!(crc.get(), standalone.get());

    let mut reference = CrcPreset::Crc16X25.engine();
    reference.update_bruteforce(&bytes);
    assert_eq!(crc.get(), reference.get());
}

#[test]
fn test_table_shared_across_threads() {
    let params = CrcParams::new(24, 0x864CFB, Convention::Msb, 0xB704CE);
    let table = Arc::new(bitcrc::CrcTable::from_params(&params).unwrap());
    let data: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();

    let mut expected = CrcEngine::new(params).unwrap();
    expected.update(&data);

    let results: Vec<u64> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = Arc::clone(&table);
                let data = &data;
                s.spawn(move || {
                    let mut crc = CrcEngine::with_table(params, table).unwrap();
                    crc.update(data);
                    crc.get()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, vec![expected.get(); 4]);
}

#[test]
fn test_file_backed_stream() {
    let name = format!("bitcrc-integration-{}.bin", std::process::id());
    let path = std::env::temp_dir().join(name);

    let mut writer = BitStream::new(IoSink::new(File::create(&path).unwrap()));
    for i in 0..100u64 {
        writer.write_bits(13, i * 77);
    }
    writer.write_flush();
    writer.into_inner().into_inner().unwrap();

    let mut reader = BitStream::new(IoSource::new(File::open(&path).unwrap()).unwrap());
    for i in 0..100u64 {
        assert_eq!(reader.read_bits(13), i * 77);
    }
    reader.read_rewind();
    assert_eq!(reader.read_bits(13), 0);
    assert_eq!(reader.read_bits(13), 77);

    std::fs::remove_file(path).unwrap();
}
