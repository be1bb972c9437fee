use std::ptr;

/// Scrambling overwrites a buffers content with zeroes. Useful to avoid
/// leaving behind a heap or stack littered with old secrets.
pub trait Scrambler {
    fn scramble(&mut self);
}

impl Scrambler for [u8] {
    fn scramble(&mut self) {
        for b in self.iter_mut() {
            // Volatile, so that the compiler does not elide a store to a
            // buffer that is about to go away.
            unsafe { ptr::write_volatile(b, 0) };
        }
    }
}

impl Scrambler for Vec<u8> {
    fn scramble(&mut self) {
        let cap = self.capacity();
        self.resize(cap, 0);
        self.as_mut_slice().scramble();
        self.truncate(0);
    }
}

impl Scrambler for String {
    fn scramble(&mut self) {
        let mut bytes = std::mem::take(self).into_bytes();
        bytes.scramble();
        // The buffer is empty, and therefore valid UTF-8.
        *self = String::from_utf8(bytes).unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice() {
        let mut buf = [0xa5u8; 8];
        buf[..].scramble();
        assert_eq!(buf, [0; 8]);
    }

    #[test]
    fn vec_keeps_allocation() {
        let mut v = b"password".to_vec();
        v.reserve(8);
        let cap = v.capacity();
        let ptr = v.as_ptr();
        v.scramble();
        assert!(v.is_empty());
        assert_eq!(v.capacity(), cap);
        assert_eq!(v.as_ptr(), ptr);
        assert!(unsafe { std::slice::from_raw_parts(ptr, cap) }
            .iter()
            .all(|&b| b == 0));
    }

    #[test]
    fn string() {
        let mut s = "hunter2".to_string();
        let cap = s.capacity();
        s.scramble();
        assert!(s.is_empty());
        assert_eq!(s.capacity(), cap);
    }
}
