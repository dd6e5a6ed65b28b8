use mockall::automock;

/// Where a flow writes the text it wants the user to see, replacing a
/// page element looked up by id.
#[automock]
pub trait StatusSink {
    fn write(&self, text: &str);
}

/// Blocking, user-facing notification.
#[automock]
pub trait UserNotifier {
    fn notify(&self, message: &str);
}
