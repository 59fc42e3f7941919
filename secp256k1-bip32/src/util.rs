pub mod securemem {

    /// zero the given slice.
    ///
    /// We assume the compiler won't optimise out the call to this function
    pub fn zero(to_zero: &mut [u8]) {

        // the unsafety of this call is bounded to the existence of the pointer
        // and the accuracy of the length of the array.
        //
        // since to_zero existence is bound to live at least as long as the call
        // of this function and that we use the length (in bytes) of the given
        // slice, this call is safe.
        unsafe {
            ::std::ptr::write_bytes(to_zero.as_mut_ptr(), 0, to_zero.len())
        }
    }
}

pub mod hex {
    //! simple implementation of hexadecimal encoding and decoding
    //!
    //! # Example
    //!
    //! ```
    //! use secp256k1_bip32::util::hex::{encode, decode};
    //!
    //! let example = b"some bytes";
    //!
    //! assert!(example.as_ref() == decode(&encode(example)).unwrap().as_slice());
    //! ```
    //!
    use std::{error, fmt, result};

    const ALPHABET : &'static [u8] = b"0123456789abcdef";

    /// hexadecimal encoding/decoding potential errors
    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
    #[cfg_attr(feature = "generic-serialization", derive(Serialize, Deserialize))]
    pub enum Error {
        /// error when a given character is not part of the supported
        /// hexadecimal alphabet. Contains the index of the faulty byte
        UnknownSymbol(usize),
        /// the input ends in the middle of a byte. Contains the number
        /// of hexadecimal digits read.
        OddLength(usize),
    }
    impl fmt::Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                &Error::UnknownSymbol(idx) => {
                    write!(f, "Unknown symbol at byte index {}", idx)
                }
                &Error::OddLength(digits) => {
                    write!(f, "Odd number of hexadecimal digits ({})", digits)
                }
            }
        }
    }
    impl error::Error for Error {}

    pub type Result<T> = result::Result<T, Error>;

    /// encode bytes into an hexadecimal string
    ///
    /// Every byte gives two digits, so `0x0f` is encoded as `"0f"`.
    ///
    ///  # Example
    ///
    /// ```
    /// use secp256k1_bip32::util::hex::encode;
    ///
    /// let example = b"some bytes";
    ///
    /// assert_eq!("736f6d65206279746573", encode(example));
    /// ```
    pub fn encode(input: &[u8]) -> String {
        let mut s = String::with_capacity(input.len() * 2);
        for &byte in input.iter() {
            s.push(ALPHABET[(byte >> 4) as usize] as char);
            s.push(ALPHABET[(byte & 0xf) as usize] as char);
        }
        s
    }

    /// decode the given hexadecimal string
    ///
    /// Both lower and upper case digits are accepted, anything else (whitespace
    /// included) is an `Error::UnknownSymbol`.
    ///
    ///  # Example
    ///
    /// ```
    /// use secp256k1_bip32::util::hex::{Error, decode};
    ///
    /// let example = r"736f6d65206279746573";
    ///
    /// assert!(decode(example).is_ok());
    /// assert_eq!(decode("abc"), Err(Error::OddLength(3)));
    /// ```
    pub fn decode(input: &str) -> Result<Vec<u8>> {
        let mut b = Vec::with_capacity(input.len() / 2);
        let mut digits = 0;
        let mut buf = 0;

        for (idx, byte) in input.bytes().enumerate() {
            let nibble = match byte {
                b'A'..=b'F' => byte - b'A' + 10,
                b'a'..=b'f' => byte - b'a' + 10,
                b'0'..=b'9' => byte - b'0',
                _ => {
                    return Err(Error::UnknownSymbol(idx));
                }
            };

            buf = (buf << 4) | nibble;
            digits += 1;
            if digits % 2 == 0 {
                b.push(buf);
                buf = 0;
            }
        }

        if digits % 2 != 0 {
            return Err(Error::OddLength(digits));
        }
        Ok(b)
    }

    #[cfg(test)]
    mod tests {
        use super::Error;

        fn encode(input: &[u8], expected: &str) {
            let encoded = super::encode(input);
            assert_eq!(encoded, expected);
        }
        fn decode(expected: &[u8], input: &str) {
            let decoded = super::decode(input).unwrap();
            assert_eq!(decoded.as_slice(), expected);
        }

        #[test]
        fn test_vector_1() {
            encode(&[1,2,3,4], "01020304");
            decode(&[1,2,3,4], "01020304");
        }

        #[test]
        fn test_vector_2() {
            encode(&[0xff,0x0f,0xff,0xff], "ff0fffff");
            decode(&[0xff,0x0f,0xff,0xff], "ff0fffff");
            decode(&[0xff,0x0f,0xff,0xff], "FF0FFFFF");
        }

        #[test]
        fn empty() {
            encode(&[], "");
            decode(&[], "");
        }

        #[test]
        fn leading_zeros_are_kept() {
            encode(&[0, 0, 0x0a], "00000a");
            decode(&[0, 0, 0x0a], "00000a");
        }

        #[test]
        fn errors() {
            assert_eq!(super::decode("0g"), Err(Error::UnknownSymbol(1)));
            assert_eq!(super::decode("123"), Err(Error::OddLength(3)));
            assert_eq!(super::decode("FF0F FFFF"), Err(Error::UnknownSymbol(4)));
            assert_eq!(super::decode("00\n"), Err(Error::UnknownSymbol(2)));
        }
    }
}

pub mod base58 {
    //! bitcoin's base58 encoding format, and its checksummed
    //! Base58Check variant.
    //!
    //! # Example
    //!
    //! ```
    //! use secp256k1_bip32::util::base58;
    //!
    //! let encoded = r"TcgsE5dzphUWfjcb9i5";
    //! let decoded = b"Hello World...";
    //!
    //! assert_eq!(decoded, base58::decode(encoded).unwrap().as_slice());
    //! assert_eq!(encoded, base58::encode(decoded));
    //! ```

    use crate::hash::Sha256d;
    use std::{error, fmt, result};

    pub const ALPHABET : &'static str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

    /// number of bytes of the double SHA256 appended by `encode_check`
    pub const CHECKSUM_SIZE : usize = 4;

    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
    #[cfg_attr(feature = "generic-serialization", derive(Serialize, Deserialize))]
    pub enum Error {
        /// error when a given character is not part of the supported
        /// base58 `ALPHABET`. Contains the index of the faulty byte.
        UnknownSymbol(usize),
        /// the decoded data is too short to hold a checksum.
        /// Contains the decoded length.
        MissingChecksum(usize),
        /// the trailing checksum does not match the payload
        InvalidChecksum,
    }
    impl fmt::Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                &Error::UnknownSymbol(idx) => {
                    write!(f, "Unknown symbol at byte index {}", idx)
                }
                &Error::MissingChecksum(len) => {
                    write!(f, "Not enough data for a checksum, received {} bytes", len)
                }
                &Error::InvalidChecksum => {
                    write!(f, "Invalid checksum")
                }
            }
        }
    }
    impl error::Error for Error {}

    pub type Result<T> = result::Result<T, Error>;

    /// encode in base58 the given input
    ///
    /// # Example
    ///
    /// ```
    /// use secp256k1_bip32::util::base58;
    ///
    /// let encoded = r"TcgsE5dzphUWfjcb9i5";
    /// let decoded = b"Hello World...";
    ///
    /// assert_eq!(encoded, base58::encode(decoded));
    /// assert_eq!("", base58::encode(b""));
    /// ```
    pub fn encode(input: &[u8]) -> String {
        base_encode(ALPHABET, input).into_iter().map(|b| b as char).collect()
    }

    /// decode from base58 the given input
    ///
    /// # Example
    ///
    /// ```
    /// use secp256k1_bip32::util::base58;
    ///
    /// let encoded = r"TcgsE5dzphUWfjcb9i5";
    /// let decoded = b"Hello World...";
    ///
    /// assert_eq!(decoded, base58::decode(encoded).unwrap().as_slice());
    /// ```
    pub fn decode(input: &str) -> Result<Vec<u8>> {
        base_decode(ALPHABET, input.as_bytes())
    }

    /// encode the given payload followed by the first `CHECKSUM_SIZE` bytes
    /// of its double SHA256.
    ///
    pub fn encode_check(payload: &[u8]) -> String {
        let checksum = Sha256d::new(payload);
        let mut buf = Vec::with_capacity(payload.len() + CHECKSUM_SIZE);
        buf.extend_from_slice(payload);
        buf.extend_from_slice(&checksum.as_ref()[..CHECKSUM_SIZE]);
        encode(&buf)
    }

    /// decode a Base58Check string, verify and strip its checksum.
    ///
    /// # Example
    ///
    /// ```
    /// use secp256k1_bip32::util::base58;
    ///
    /// let encoded = base58::encode_check(b"payload");
    ///
    /// assert_eq!(b"payload", base58::decode_check(&encoded).unwrap().as_slice());
    /// ```
    pub fn decode_check(input: &str) -> Result<Vec<u8>> {
        let mut bytes = decode(input)?;
        if bytes.len() < CHECKSUM_SIZE {
            return Err(Error::MissingChecksum(bytes.len()));
        }
        let payload_len = bytes.len() - CHECKSUM_SIZE;
        let expected = Sha256d::new(&bytes[..payload_len]);
        if expected.as_ref()[..CHECKSUM_SIZE] != bytes[payload_len..] {
            return Err(Error::InvalidChecksum);
        }
        bytes.truncate(payload_len);
        Ok(bytes)
    }

    #[cfg(test)]
    mod tests {
        use super::Error;

        fn encode(input: &[u8], expected: &str) {
            let encoded = super::encode(input);
            assert_eq!(encoded, expected);
        }
        fn decode(expected: &[u8], input: &str) {
            let decoded = super::decode(input).unwrap();
            assert_eq!(decoded.as_slice(), expected);
        }

        #[test]
        fn test_vector_1() {
            encode(b"\0\0\0\0", "1111");
            decode(b"\0\0\0\0", "1111");
        }

        #[test]
        fn test_vector_2() {
            encode(b"This is awesome!", "BRY7dK2V98Sgi7CFWiZbap");
            decode(b"This is awesome!", "BRY7dK2V98Sgi7CFWiZbap");
        }

        #[test]
        fn test_vector_3() {
            encode(b"Hello World...", "TcgsE5dzphUWfjcb9i5");
            decode(b"Hello World...", "TcgsE5dzphUWfjcb9i5");
        }

        #[test]
        fn test_vector_4() {
            encode(b"\0abc", "1ZiCa");
            decode(b"\0abc", "1ZiCa");
        }

        #[test]
        fn test_vector_5() {
            encode(b"\0\0abc", "11ZiCa");
            decode(b"\0\0abc", "11ZiCa");
        }

        #[test]
        fn test_vector_6() {
            encode(b"\0\0\0abc", "111ZiCa");
            decode(b"\0\0\0abc", "111ZiCa");
        }

        #[test]
        fn test_vector_7() {
            encode(b"abcdefghijklmnopqrstuvwxyz", "3yxU3u1igY8WkgtjK92fbJQCd4BZiiT1v25f");
            decode(b"abcdefghijklmnopqrstuvwxyz", "3yxU3u1igY8WkgtjK92fbJQCd4BZiiT1v25f");
        }

        #[test]
        fn empty() {
            encode(b"", "");
            decode(b"", "");
        }

        #[test]
        fn unknown_symbol() {
            assert_eq!(super::decode("1Zi0a"), Err(Error::UnknownSymbol(3)));
            assert_eq!(super::decode("l"), Err(Error::UnknownSymbol(0)));
        }

        #[test]
        fn check_detects_corruption() {
            let encoded = super::encode_check(b"\0\x01\x02");
            assert_eq!(super::decode_check(&encoded).unwrap(), b"\0\x01\x02".to_vec());

            let mut raw = super::decode(&encoded).unwrap();
            let last = raw.len() - 1;
            raw[last] ^= 0x01;
            let corrupted = super::encode(&raw);
            assert_eq!(super::decode_check(&corrupted), Err(Error::InvalidChecksum));

            assert_eq!(super::decode_check("11"), Err(Error::MissingChecksum(2)));
        }
    }

    fn base_encode(alphabet_s: &str, input: &[u8]) -> Vec<u8> {
        let alphabet = alphabet_s.as_bytes();
        let base = alphabet.len() as u32;

        // little endian digits of the big number, without the leading zero bytes
        let mut digits : Vec<u8> = Vec::with_capacity(input.len() * 138 / 100 + 1);
        for byte in input.iter() {
            let mut carry = *byte as u32;
            for digit in digits.iter_mut() {
                carry += (*digit as u32) << 8;
                *digit = (carry % base) as u8;
                carry /= base;
            }

            while carry > 0 {
                digits.push((carry % base) as u8);
                carry /= base;
            }
        }

        let zcount = input.iter().take_while(|x| **x == 0).count();

        let mut string = Vec::with_capacity(zcount + digits.len());
        string.extend(::std::iter::repeat(alphabet[0]).take(zcount));
        string.extend(digits.iter().rev().map(|digit| alphabet[*digit as usize]));
        string
    }

    fn base_decode(alphabet_s: &str, input: &[u8]) -> Result<Vec<u8>> {
        let alphabet = alphabet_s.as_bytes();
        let base = alphabet.len() as u32;

        let zcount = input.iter().take_while(|x| **x == alphabet[0]).count();

        // little endian bytes of the big number
        let mut bytes : Vec<u8> = Vec::with_capacity(input.len());
        for i in zcount..input.len() {
            let value = match alphabet.iter().position(|&x| x == input[i]) {
                Some(idx) => idx,
                None      => return Err(Error::UnknownSymbol(i))
            };
            let mut carry = value as u32;
            for byte in bytes.iter_mut() {
                carry += *byte as u32 * base;
                *byte = carry as u8;
                carry >>= 8;
            }

            while carry > 0 {
                bytes.push(carry as u8);
                carry >>= 8;
            }
        }

        bytes.extend(::std::iter::repeat(0).take(zcount));
        bytes.reverse();
        Ok(bytes)
    }
}
