//! User-facing bot texts. The bot speaks Russian.

pub const PROCESSING: &str = "🎤 Обрабатываю голосовое сообщение...";
pub const TRANSCRIBING: &str = "📝 Транскрибирую аудио...";
pub const ANALYZING: &str = "🤖 Анализирую и создаю резюме...";

pub const VOICE_ERROR: &str =
    "❌ Произошла ошибка при обработке голосового сообщения. Попробуйте еще раз.";

pub const TEXT_HINT: &str = "Отправьте голосовое сообщение для создания записи в дневнике.";

pub fn welcome(mini_app_url: &str) -> String {
    format!(
        "Привет! Я бот для ведения терапевтического дневника. \n\n\
🎤 Отправьте голосовое сообщение, и я создам запись в дневнике с транскрипцией и кратким резюме.\n\n\
📱 Или откройте приложение для просмотра и редактирования записей:\n\
{mini_app_url}\n\n\
💡 Вы можете:\n\
• Отправлять голосовые сообщения\n\
• Просматривать все записи\n\
• Редактировать и дополнять записи\n\
• Добавлять изображения"
    )
}

pub fn entry_created(date: &str, title: &str, deep_link: &str) -> String {
    format!(
        "✅ Запись создана успешно!\n\n\
📅 Дата: {date}\n\
📝 Резюме: {title}\n\n\
🔗 Откройте запись в приложении: {deep_link}\n\n\
💡 Вы можете отредактировать дату, добавить текст или изображения в приложении."
    )
}
