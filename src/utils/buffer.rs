// -------------------------------------------------------------------------------------------------

/// Set all samples in the given buffer to zero.
#[inline]
pub fn clear_buffer(buffer: &mut [f32]) {
    buffer.iter_mut().for_each(|s| *s = 0.0);
}

// -------------------------------------------------------------------------------------------------

/// Copy a mono buffer into an interleaved buffer with the given channel count, duplicating each
/// mono sample into all channels of the frame.
///
/// Returns the number of mono samples which got copied: this is the smaller of the mono buffer's
/// length and the interleaved buffer's frame count.
pub fn mono_to_interleaved(mono: &[f32], interleaved: &mut [f32], channel_count: usize) -> usize {
    debug_assert!(channel_count > 0, "Invalid channel count");
    match channel_count {
        1 => {
            let count = mono.len().min(interleaved.len());
            interleaved[..count].copy_from_slice(&mono[..count]);
            count
        }
        2 => {
            let mut count = 0;
            for (frame, value) in interleaved.chunks_exact_mut(2).zip(mono) {
                frame[0] = *value;
                frame[1] = *value;
                count += 1;
            }
            count
        }
        _ => {
            let mut count = 0;
            for (frame, value) in interleaved.chunks_exact_mut(channel_count).zip(mono) {
                frame.iter_mut().for_each(|s| *s = *value);
                count += 1;
            }
            count
        }
    }
}

// -------------------------------------------------------------------------------------------------
