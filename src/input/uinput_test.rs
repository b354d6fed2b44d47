use std::error::Error;

use nix::errno::Errno;

use crate::{hid::HidError, input::uinput::ff_retval};

#[tokio::test]
async fn test_ff_retval() -> Result<(), Box<dyn Error>> {
    let einval = -(Errno::EINVAL as i32);
    assert!(einval < 0);

    assert_eq!(ff_retval(&Ok(())), 0);
    assert_eq!(ff_retval(&Err(HidError::InvalidEffect(16))), einval);
    assert_eq!(
        ff_retval(&Err(HidError::Unsupported("constant".into()))),
        einval
    );

    Ok(())
}
