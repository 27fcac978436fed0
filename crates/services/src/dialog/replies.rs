//! Every text the bot shows to a chat, in each supported locale.

use lesson_core::model::{Language, LessonSummary, Locale};

use crate::delivery::{OutboundMessage, ReplyKeyboard};

pub fn ask_name(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => {
            "Hello! I'm your personal programming guide. \
             Before we start, let's get acquainted: what should I call you?"
        }
        Locale::Uk => {
            "Вітаю! Я Ваш персональний довідник з програмування. \
             Перш ніж розпочати, давайте познайомитись! Як до Вас звертатися?"
        }
    })
}

pub fn name_saved(locale: Locale, name: &str) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => {
            format!("{name}, have a look at what this bot can do: the /help command will show you.")
        }
        Locale::Uk => format!(
            "{name}, пропоную ознайомитись із опціями боту, у цьому Вам допоможе команда /help."
        ),
    })
}

pub fn help(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => {
            "Here is what I can do:\n\
             /start - introduce yourself\n\
             /languages - choose the programming language to study\n\
             /lesson - pick a lesson of the chosen language\n\
             /continue - go on to the next lesson\n\
             /quiz - get a quiz to practise what you learned\n\
             /exit - finish working with the bot"
        }
        Locale::Uk => {
            "Щоб нам з тобою поладнати потрібно правила завчати та інструкції читати!\n\
             Отож:\n\
             /start - знайомство з ботом\n\
             /languages - дає можливість обрати мову з якою хочете працювати далі\n\
             /lesson - надає текстові матеріали для вивчення мов\n\
             /continue - перехід до наступного уроку\n\
             /quiz - тести до обраної теми для кращого освоєння вивченого\n\
             /exit - завершує роботу з ботом"
        }
    })
}

pub fn choose_language(locale: Locale) -> OutboundMessage {
    let prompt = match locale {
        Locale::En => "Choose a programming language:",
        Locale::Uk => "Оберіть мову програмування:",
    };
    OutboundMessage::text(prompt).with_keyboard(ReplyKeyboard::one_time(
        Language::ALL.iter().map(|lang| lang.display_name()),
    ))
}

pub fn unknown_language(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => "Sorry, that language is not on the list. Please try again.",
        Locale::Uk => "Вибачте, такої мови немає в списку. Будь ласка, спробуйте знову.",
    })
}

pub fn language_selected(locale: Locale, language: Language) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => format!(
            "You chose {language}. Now you can browse the available lessons with /lesson."
        ),
        Locale::Uk => format!(
            "Ви обрали {language}. Тепер ви можете переглянути доступні уроки за допомогою /lesson."
        ),
    })
}

pub fn choose_language_first(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => "Please choose a programming language first with /languages.",
        Locale::Uk => {
            "Будь ласка, спочатку оберіть мову програмування за допомогою /languages."
        }
    })
}

pub fn choose_lesson_first(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => "You haven't opened a lesson yet. Pick one with /lesson.",
        Locale::Uk => "Ви ще не відкрили жодного уроку. Оберіть урок за допомогою /lesson.",
    })
}

pub fn no_lessons(locale: Locale, language: Language) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => format!("Sorry, there are no lessons for {language} at the moment."),
        Locale::Uk => format!("Вибачте, але наразі немає уроків для мови {language}."),
    })
}

/// Numbered by position, which is also what the user types back.
pub fn lesson_list(
    locale: Locale,
    language: Language,
    lessons: &[LessonSummary],
) -> OutboundMessage {
    let list = lessons
        .iter()
        .enumerate()
        .map(|(i, lesson)| format!("{}. {}", i + 1, lesson.title))
        .collect::<Vec<_>>()
        .join("\n");
    OutboundMessage::text(match locale {
        Locale::En => format!(
            "Lessons for {language}:\n{list}\n\
             Choose a topic and send the number of the lesson."
        ),
        Locale::Uk => format!(
            "Перелік уроків для {language}:\n{list}\n\
             Оберіть потрібну Вам тему і введіть, будь ласка, цифру відповідного уроку."
        ),
    })
}

pub fn lesson_out_of_range(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => "Sorry, there is no lesson with that number. Please try again.",
        Locale::Uk => {
            "Вибачте, Ви помилилися під час введення, такого уроку не існує, спробуйте ще раз."
        }
    })
}

pub fn lesson_not_a_number(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => "Please send a valid lesson number:",
        Locale::Uk => "Будь ласка, введіть коректну цифру уроку:",
    })
}

pub fn lesson_not_found(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => "Sorry, that lesson could not be found.",
        Locale::Uk => "Вибачте, урок не знайдено.",
    })
}

pub fn after_lesson(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => {
            "To move on to the next lesson, send /continue.\n\
             To start practising, send /quiz.\n\
             To leave, send /exit."
        }
        Locale::Uk => {
            "Щоб продовжити вивчення і перейти до наступного уроку натисніть /continue.\n\
             Щоб почати тренування /quiz.\n\
             Щоб вийти /exit."
        }
    })
}

pub fn last_lesson_reached(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => {
            "That was the last lesson for this programming language.\n\
             To start practising, send /quiz.\n\
             To leave, send /exit."
        }
        Locale::Uk => {
            "Це був останній урок з цієї мови програмування.\n\
             Щоб почати тренування /quiz.\n\
             Щоб вийти /exit."
        }
    })
}

pub fn quiz_link(locale: Locale, language: Language, url: &str) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => format!("Here is your quiz for {language}:\n{url}"),
        Locale::Uk => format!("Ось ваше посилання на тест для {language}:\n{url}"),
    })
}

pub fn no_quiz(locale: Locale, language: Language) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => format!("Sorry, there are no quizzes for {language} at the moment."),
        Locale::Uk => format!("Вибачте, наразі немає тестів для мови {language}."),
    })
}

pub fn farewell(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => "Thanks for using the bot. Goodbye!",
        Locale::Uk => "Дякуємо за використання бота. До побачення!",
    })
}

pub fn unknown_input(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => "I didn't catch that. Send /help to see what I can do.",
        Locale::Uk => "Не зрозумів Вас. Надішліть /help, щоб побачити, що я вмію.",
    })
}

pub fn internal_error(locale: Locale) -> OutboundMessage {
    OutboundMessage::text(match locale {
        Locale::En => "Something went wrong on our side. Please try again in a moment.",
        Locale::Uk => "Щось пішло не так з нашого боку. Будь ласка, спробуйте трохи згодом.",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::LessonNumber;

    #[test]
    fn language_menu_offers_every_language_once() {
        let menu = choose_language(Locale::En);
        let keyboard = menu.keyboard.expect("keyboard");
        assert!(keyboard.one_time);
        assert_eq!(
            keyboard.options,
            vec!["Java", "JavaScript", "Python", "C++", "C#", "SQL"]
        );
    }

    #[test]
    fn lesson_list_numbers_by_position() {
        let lessons = vec![
            LessonSummary {
                number: LessonNumber::new(1).unwrap(),
                title: "Intro".into(),
            },
            LessonSummary {
                number: LessonNumber::new(3).unwrap(),
                title: "Loops".into(),
            },
        ];
        let text = lesson_list(Locale::En, Language::Python, &lessons).text;
        assert!(text.starts_with("Lessons for Python:\n1. Intro\n2. Loops\n"));
    }

    #[test]
    fn ukrainian_texts_keep_commands_and_names() {
        assert!(after_lesson(Locale::Uk).text.contains("/continue"));
        assert_eq!(
            quiz_link(Locale::Uk, Language::Cpp, "https://itproger.com/practice/cpp").text,
            "Ось ваше посилання на тест для C++:\nhttps://itproger.com/practice/cpp"
        );
        assert_eq!(
            choose_language(Locale::Uk).keyboard,
            choose_language(Locale::En).keyboard
        );
        assert!(name_saved(Locale::Uk, "Олена").text.starts_with("Олена,"));
    }
}
